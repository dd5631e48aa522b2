use anyhow::Result;

use em_datasets::config::ConsolidatorConfig;
use em_datasets::data::loader::load_metadata;
use em_datasets::report::{build_report, console_banner, console_results, write_report};

fn main() -> Result<()> {
    env_logger::init();

    let config = ConsolidatorConfig::default();
    print!("{}", console_banner());

    let datasets = load_metadata(&config)?;
    let report = build_report(&datasets);
    write_report(&report, &config.output_path())?;

    print!("{}", console_results(&report));
    Ok(())
}
