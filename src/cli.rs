use clap::{Parser, builder::styling};

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Cyan.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Generate commit messages for staged changes, optionally split into
/// several focused commits.
#[derive(Parser, Debug, Default)]
#[command(name = "commit-wizard")]
#[command(author, version, long_about = None)]
#[command(styles = STYLES)]
pub struct Cli {
    /// Only print errors
    #[arg(short, long)]
    pub silent: bool,

    /// Commit generated messages without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Shortcut for --yes --silent
    #[arg(short, long)]
    pub auto: bool,

    /// Pick the files of each commit by hand
    #[arg(long, conflicts_with = "smart_split")]
    pub split: bool,

    /// Let the model group the staged files into commits
    #[arg(long)]
    pub smart_split: bool,

    /// Generate messages but do not commit
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
