use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use numpair_core::Aspect;
use numpair_pipeline::{run_categorize, run_extract, CategorizeReport, ExtractReport, PipelineConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "numpair")]
#[command(about = "Number pair data preparation: SQL dump -> numbers.json -> telephone_type.json")]
struct Cli {
    #[command(flatten)]
    paths: PathOverrides,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Relative paths resolve against NUMPAIR_WORKSPACE_ROOT (default ".").
#[derive(Debug, Args)]
struct PathOverrides {
    /// SQL dump to read [env: NUMPAIR_SQL_PATH]
    #[arg(long, global = true)]
    sql: Option<PathBuf>,
    /// numbers.json location [env: NUMPAIR_NUMBERS_JSON]
    #[arg(long, global = true)]
    numbers: Option<PathBuf>,
    /// telephone_type.json location [env: NUMPAIR_TELEPHONE_JSON]
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// YAML keyword lists replacing the built-in ones [env: NUMPAIR_KEYWORD_RULES]
    #[arg(long, global = true)]
    keywords: Option<PathBuf>,
}

impl PathOverrides {
    fn apply(self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(sql) = self.sql {
            config.sql_path = sql;
        }
        if let Some(numbers) = self.numbers {
            config.numbers_json_path = numbers;
        }
        if let Some(output) = self.output {
            config.telephone_json_path = output;
        }
        if let Some(keywords) = self.keywords {
            config.keyword_rules_path = Some(keywords);
        }
        config
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse the SQL dump and write numbers.json
    Extract,
    /// Bucket numbers.json by dominant aspect and write telephone_type.json
    Categorize,
    /// Extract, then categorize
    Run,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.paths.apply(PipelineConfig::from_env());

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Extract => print_extract(&run_extract(&config)?),
        Commands::Categorize => print_categorize(&run_categorize(&config)?),
        Commands::Run => {
            print_extract(&run_extract(&config)?);
            print_categorize(&run_categorize(&config)?);
        }
    }

    Ok(())
}

fn print_extract(report: &ExtractReport) {
    println!(
        "parsed {}: statements={} skipped={} duplicates={}",
        report.source.display(),
        report.statements,
        report.skipped,
        report.replaced
    );
    println!(
        "exported {} number pairs to {} (sha256={})",
        report.records,
        report.output.path.display(),
        report.output.content_hash
    );

    let Some(sample) = &report.sample else {
        return;
    };
    println!("\nSample entry:");
    println!("  Pair: {}", sample.pairnumber);
    println!("  Point: {}", sample.pairpoint);
    println!("  Nature: {}", sample.nature.as_str());
    println!("  Summary: {}", sample.summary);
    println!("  Aspects:");
    for (_, detail) in sample.aspects.iter() {
        println!("    {}: {}% - {}", detail.th, detail.percentage, detail.insight);
    }
}

fn print_categorize(report: &CategorizeReport) {
    println!(
        "categorized {} pairs from {} ({} below threshold, {} unreadable)",
        report.records,
        report.source.display(),
        report.below_threshold,
        report.rejected
    );
    println!(
        "generated {} (sha256={})",
        report.output.path.display(),
        report.output.content_hash
    );

    println!("\nSummary:");
    for aspect in Aspect::ALL {
        let category = report.document.categories.get(aspect);
        println!("  {}: {} best pairs", category.th, category.best_pairs.len());
        if !category.best_pairs.is_empty() {
            let top: Vec<&str> = category.best_pairs.iter().take(5).map(String::as_str).collect();
            println!("    Top 5: {}", top.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_runs_both_stages_with_defaults() {
        let cli = Cli::try_parse_from(["numpair"]).unwrap();
        assert!(cli.command.is_none());
        let config = cli.paths.apply(PipelineConfig::default());
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn flags_override_paths_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "numpair",
            "extract",
            "--sql",
            "dump.sql",
            "--keywords",
            "rules/keywords.yaml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Extract)));
        let config = cli.paths.apply(PipelineConfig::default());
        assert_eq!(config.sql_path, PathBuf::from("dump.sql"));
        assert_eq!(
            config.keyword_rules_path,
            Some(PathBuf::from("rules/keywords.yaml"))
        );
        assert_eq!(
            config.numbers_json_path,
            PathBuf::from("mobile_app/assets/numbers.json")
        );
    }
}
