use anyhow::{Context, Result};
use clap::Parser;
use lessonkit::Config;
use lessonkit::replay::{self, ReplayScript};
use lessonkit::story::{JsonFileStore, Story};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "lessonkit")]
#[command(version, about = "Interactive lesson tools: trend-line drawing and story progress")]
struct Cli {
    /// Replay a scripted trend-line session and print the resulting figure
    #[arg(long, value_name = "FILE", conflicts_with = "summarize")]
    replay: Option<PathBuf>,

    /// Summarize a saved story's progress
    #[arg(long, value_name = "FILE")]
    summarize: Option<PathBuf>,

    /// Print the effective configuration as TOML
    #[arg(long)]
    print_config: bool,

    /// Load configuration from FILE instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if cli.print_config {
        print!("{}", config.to_toml()?);
    } else if let Some(path) = cli.replay {
        let script = ReplayScript::load(&path)?;
        let outcome = replay::run(&script, &config)?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if let Some(path) = cli.summarize {
        summarize(&path, &config)?;
    } else {
        // No flags: show usage
        println!("lessonkit: Interactive lesson tools");
        println!();
        println!("Usage:");
        println!("  lessonkit --replay <FILE>      Replay a trend-line session script");
        println!("  lessonkit --summarize <FILE>   Show progress of a saved story");
        println!("  lessonkit --print-config       Print the effective configuration");
        println!("  lessonkit --help               Show help");
        println!();
        println!("Configuration is read from ~/.config/lessonkit/config.toml");
    }

    Ok(())
}

fn summarize(path: &Path, config: &Config) -> Result<()> {
    let dict = JsonFileStore::new(path)
        .load()?
        .with_context(|| format!("No story found at {}", path.display()))?;

    let mut story = Story::new("story", &config.story);
    story
        .update_from_dict(dict)
        .with_context(|| format!("Invalid story in {}", path.display()))?;

    let state = story.state();
    println!("Story: {}", state.name.as_deref().unwrap_or("(unnamed)"));
    println!("Stage: {}", state.stage_index);
    println!("Step: {}", state.step_index);
    println!("Max stage reached: {}", state.max_stage_index);
    if state.has_scoring {
        println!("Total score: {}", state.total_score);
    }
    Ok(())
}
