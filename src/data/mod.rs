//! Data layer: metadata loading, analysis, and table rendering.
//!
//! Architecture:
//! ```text
//!  <dataset>/<data>/metadata.json  (one per configured source)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  existing files → LoadedDatasets
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ analysis  │  ExtractedRecord, ResolutionAnalysis, TechniqueGroups
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  table    │  fixed-width comparison text
//!   └──────────┘
//! ```
//!
//! Each stage consumes the complete output of the previous one.

pub mod analysis;
pub mod loader;
pub mod model;
pub mod table;
