use anyhow::Result;

use tree_classify::classifier::ClassifierKind;
use tree_classify::cli;
use tree_classify::config::PipelineConfig;

fn main() -> Result<()> {
    cli::init_logging();

    let matches = cli::decision_tree_command().get_matches();
    let config = cli::resolve_config(PipelineConfig::decision_tree(), &matches)?;

    cli::execute(&config, ClassifierKind::DecisionTree)?;
    Ok(())
}
