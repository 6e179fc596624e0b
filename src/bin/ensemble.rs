use anyhow::Result;

use tree_classify::cli;
use tree_classify::config::PipelineConfig;

fn main() -> Result<()> {
    cli::init_logging();

    let matches = cli::ensemble_command().get_matches();
    let kind = cli::ensemble_kind(&matches)?;
    let config = cli::resolve_config(PipelineConfig::ensemble(), &matches)?;

    cli::execute(&config, kind)?;
    Ok(())
}
