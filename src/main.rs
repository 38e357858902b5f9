use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use picobot::io::{parse_grid, parse_rules, parse_start};
use picobot::machine::{RuleTable, NEIGHBORHOOD_COUNT};
use picobot::render::event_frame;
use picobot::{SimulationConfig, Simulator};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "picobot", about = "An implementation of the PicoBot programming language")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a rule file on an environment until coverage, stall or error.
    Run {
        /// Environment file (whitespace-separated rows of 0 and 1).
        #[arg(short = 'e', long = "env")]
        env_file: PathBuf,
        /// Rules file (default: read from standard input).
        #[arg(short = 'r', long = "rules")]
        rules_file: Option<PathBuf>,
        /// Starting cell as "<row>, <col>" (default: random free cell).
        #[arg(short = 'b', long = "bot-home")]
        bot_home: Option<String>,
        /// Number of steps allowed for the bot (default: governed by the rules).
        #[arg(short = 'n', long = "max-steps", value_parser = clap::value_parser!(u64).range(1..))]
        max_steps: Option<u64>,
        /// Seed for the random starting cell.
        #[arg(long)]
        seed: Option<u64>,
        /// Print the grid after every step.
        #[arg(short = 'g', long)]
        frames: bool,
        /// Output format for step events.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Validate a rule file and list neighborhoods no rule covers.
    Check {
        /// Rules file (default: read from standard input).
        rules_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `bot at: (r, c), cells left: n` lines
    Text,
    /// One JSON object per step
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            env_file,
            rules_file,
            bot_home,
            max_steps,
            seed,
            frames,
            format,
        } => {
            let config = SimulationConfig {
                start: bot_home
                    .as_deref()
                    .map(parse_start)
                    .transpose()
                    .context("invalid --bot-home")?,
                max_steps: step_ceiling(max_steps)?,
                seed,
            };
            run_program(&env_file, rules_file.as_deref(), config, frames, format)?
        }
        Commands::Check { rules_file } => run_check(rules_file.as_deref())?,
    }

    Ok(())
}

/// `RUST_LOG` directives as given, `warn` when unset or unparsable
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn step_ceiling(max_steps: Option<u64>) -> Result<Option<usize>> {
    max_steps
        .map(usize::try_from)
        .transpose()
        .context("--max-steps does not fit in usize")
}

fn run_program(
    env_path: &Path,
    rules_path: Option<&Path>,
    config: SimulationConfig,
    frames: bool,
    format: OutputFormat,
) -> Result<()> {
    let env_text = std::fs::read_to_string(env_path)
        .with_context(|| format!("failed to read environment from {}", env_path.display()))?;
    let grid = parse_grid(&env_text)
        .with_context(|| format!("invalid environment {}", env_path.display()))?;
    let rules = load_rules(rules_path)?;

    let mut simulator =
        Simulator::new(grid, rules, config).context("failed to place the bot")?;

    while let Some(event) = simulator.next() {
        match format {
            OutputFormat::Text if frames => print!("{}", event_frame(simulator.grid(), &event)),
            OutputFormat::Text => println!("{}", event),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string(&event).context("failed to encode step event")?
            ),
        }
        if let (Some(reason), OutputFormat::Text) = (event.termination, format) {
            println!("{}", reason);
        }
    }

    match simulator.termination() {
        Some(reason) if reason.is_fault() => bail!("run aborted after {} steps: {}", simulator.steps(), reason),
        _ => Ok(()),
    }
}

fn run_check(rules_path: Option<&Path>) -> Result<()> {
    let rules = load_rules(rules_path)?;

    for state in rules.states() {
        let gaps = rules.uncovered(state);
        let covered = NEIGHBORHOOD_COUNT - gaps.len();
        println!(
            "state {}: {} rules, {}/{} neighborhoods covered",
            state,
            rules.rules(state).len(),
            covered,
            NEIGHBORHOOD_COUNT
        );
        if !gaps.is_empty() {
            let names: Vec<String> = gaps.iter().map(|n| n.to_string()).collect();
            println!("  uncovered: {}", names.join(" "));
        }
    }
    for state in rules.dangling_states() {
        println!("state {} is entered but has no rules", state);
    }

    Ok(())
}

fn load_rules(path: Option<&Path>) -> Result<RuleTable> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rules from {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read rules from standard input")?;
            text
        }
    };
    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());
    parse_rules(&text).with_context(|| format!("invalid rules in {}", source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn log_level_comes_from_rust_log() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("picobot=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
        assert_eq!(log_filter(Some("picobot=loud")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn step_ceiling_converts_without_truncation() {
        assert_eq!(step_ceiling(None).unwrap(), None);
        assert_eq!(step_ceiling(Some(500)).unwrap(), Some(500));
        if usize::BITS < 64 {
            assert!(step_ceiling(Some(u64::MAX)).is_err());
        } else {
            assert_eq!(step_ceiling(Some(u64::MAX)).unwrap(), Some(usize::MAX));
        }
    }
}
