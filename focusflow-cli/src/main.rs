//! FocusFlow CLI entry point.
//!
//! Commands:
//! - `focusflow list`: List tasks (`--status`, `--search`, `--active`, `--recent`, `--json`)
//! - `focusflow board`: Show the three columns side by side
//! - `focusflow add <title>`: Create a task
//! - `focusflow show|update|status|delete <id>`: Work on one task
//! - `focusflow drag <active> [over]`: Drop a task on a column or another task
//! - `focusflow settings show|set`: Pomodoro and theme settings

use clap::Parser;
use tracing_subscriber::EnvFilter;

use focusflow_cli::{run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("focusflow_cli=debug,focusflow_board=debug,focusflow_store=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run(cli).await;
    std::process::exit(exit_code);
}
