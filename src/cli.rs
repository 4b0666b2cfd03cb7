use std::path::PathBuf;

use clap::Parser;

const HELP_EPILOG: &str = r#"Config resolution order:
  1) --config/-c PATH
  2) $RUNWATCH_CONFIG
  3) XDG default: ~/.config/runwatch/agent.yaml

Signals while running:
  SIGUSR1          START (no-op when already running)
  SIGUSR2          STOP and exit
  SIGINT/SIGTERM   STOP and exit
"#;

#[derive(Debug, Parser)]
#[command(
    name = "runwatch",
    version,
    about = "Foreground stopwatch agent with a persistent desktop notification",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Start idle and wait for SIGUSR1 instead of starting immediately
    #[arg(long)]
    pub idle: bool,
    /// Log elapsed time instead of posting desktop notifications
    #[arg(long)]
    pub log_only: bool,
}
