//! Electron-microscopy dataset tooling.
//!
//! * [`download`] fetches HTTP-hosted datasets and writes a `metadata.json`
//!   next to the files.
//! * [`data`] and [`report`] read those metadata files back and merge them
//!   into one comparison report.

pub mod config;
pub mod data;
pub mod download;
pub mod report;
