use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use em_datasets::download::empiar::{self, EmpiarDownloader};
use em_datasets::download::epfl::{self, EpflDownloader};
use em_datasets::download::idr::{self, IdrDownloader};
use em_datasets::download::metadata::DownloadMetadata;
use em_datasets::download::openorganelle::{self, OpenOrganelleDownloader};

/// Download electron-microscopy datasets and record their metadata.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Directory the per-dataset folders are created in.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// EPFL hippocampus TIFF stacks.
    Epfl {
        /// Number of files to download.
        #[arg(short, long, default_value_t = epfl::DEFAULT_FILES)]
        files: usize,
        /// Parallel download threads.
        #[arg(short, long, default_value_t = epfl::DEFAULT_THREADS,
              value_parser = clap::value_parser!(u16).range(1..))]
        threads: u16,
    },
    /// EMPIAR-11759 zebrafish retina DM3 slices, over FTP.
    Empiar {
        /// Number of DM3 files to download.
        #[arg(short, long, default_value_t = empiar::DEFAULT_FILES)]
        files: usize,
        /// Parallel download threads.
        #[arg(short, long, default_value_t = empiar::DEFAULT_THREADS,
              value_parser = clap::value_parser!(u16).range(1..))]
        threads: u16,
    },
    /// IDR-0086 FIB-SEM TIFF volumes, over FTP.
    Idr {
        /// Number of TIFF volumes to download.
        #[arg(short, long, default_value_t = idr::DEFAULT_FILES)]
        files: usize,
        /// Parallel download threads.
        #[arg(short, long, default_value_t = idr::DEFAULT_THREADS,
              value_parser = clap::value_parser!(u16).range(1..))]
        threads: u16,
    },
    /// Random OpenOrganelle JRC mouse liver Zarr chunks.
    Openorganelle {
        /// Number of chunks to download.
        #[arg(short, long, default_value_t = openorganelle::DEFAULT_CHUNKS)]
        chunks: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let metadata = match cli.command {
        Command::Epfl { files, threads } => {
            let downloader = EpflDownloader::new(&cli.root)?;
            downloader
                .download(files, usize::from(threads))
                .with_context(|| format!("downloading into {}", downloader.out_dir().display()))?
        }
        Command::Empiar { files, threads } => {
            let downloader = EmpiarDownloader::new(&cli.root)?;
            downloader
                .download(files, usize::from(threads))
                .with_context(|| format!("downloading into {}", downloader.out_dir().display()))?
        }
        Command::Idr { files, threads } => {
            let downloader = IdrDownloader::new(&cli.root)?;
            downloader
                .download(files, usize::from(threads))
                .with_context(|| format!("downloading into {}", downloader.out_dir().display()))?
        }
        Command::Openorganelle { chunks } => {
            let downloader = OpenOrganelleDownloader::new(&cli.root)?;
            downloader
                .download(chunks, &mut rand::rng())
                .with_context(|| format!("downloading into {}", downloader.out_dir().display()))?
        }
    };

    print_summary(&metadata);
    Ok(())
}

fn print_summary(metadata: &DownloadMetadata) {
    println!("{}", metadata.dataset);
    if let Some(total) = metadata.total_available_files {
        println!("{total} matching files on the server");
    }
    println!(
        "Downloaded {} files ({:.1} MB)",
        metadata.files_downloaded, metadata.total_size_mb
    );
    for file in &metadata.files {
        println!("  {} ({} bytes)", file.filename, file.size_bytes);
    }
}
