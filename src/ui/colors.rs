use colored::Colorize;

use crate::git::DiffStats;

/// Green ✓ line on stdout.
pub fn success(msg: &str, colored: bool) {
    if colored {
        println!("{} {}", "✓".green().bold(), msg.green());
    } else {
        println!("✓ {}", msg);
    }
}

/// Red ✗ line on stderr.
pub fn error(msg: &str, colored: bool) {
    if colored {
        eprintln!("{} {}", "✗".red().bold(), msg.red());
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Yellow ⚠ line on stdout.
pub fn warning(msg: &str, colored: bool) {
    if colored {
        println!("{} {}", "⚠".yellow().bold(), msg.yellow());
    } else {
        println!("⚠ {}", msg);
    }
}

/// Blue ℹ line on stdout.
pub fn info(msg: &str, colored: bool) {
    println!("{}", format_info(msg, colored));
}

pub fn format_info(msg: &str, colored: bool) -> String {
    if colored {
        format!("{} {}", "ℹ".blue().bold(), msg.blue())
    } else {
        format!("ℹ {}", msg)
    }
}

/// Dimmed `[step] message` line.
pub fn step(step: &str, msg: &str, colored: bool) {
    if colored {
        println!(
            "{} {}",
            format!("[{}]", step).bright_black().bold(),
            msg.bright_black()
        );
    } else {
        println!("[{}] {}", step, msg);
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// `3 files changed, 10 insertions(+), 1 deletion(-)`
pub fn format_diff_stats(stats: &DiffStats, colored: bool) -> String {
    let files = plural(stats.files_changed.len(), "file", "files");
    let insertions = plural(stats.insertions, "insertion(+)", "insertions(+)");
    let deletions = plural(stats.deletions, "deletion(-)", "deletions(-)");

    if colored {
        format!(
            "{} changed, {}, {}",
            files.bold(),
            insertions.green(),
            deletions.red()
        )
    } else {
        format!("{} changed, {}, {}", files, insertions, deletions)
    }
}
