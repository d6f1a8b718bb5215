//! User-facing output, and the terminal implementation of [`Reporter`].

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use bizfly_core::Reporter;
use bizfly_schema::{ArtifactEntry, Platform, Sha256Digest};
use crossterm::{
    QueueableCommand,
    cursor::MoveToColumn,
    style::Stylize,
    terminal::{Clear, ClearType},
};

use super::theme::format_size;

/// Prints status lines to stderr. Command results are printed to stdout by
/// the commands themselves.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    quiet: bool,
    live: bool,
}

impl Output {
    /// Create a new output handle.
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            live: !quiet && std::io::stderr().is_terminal(),
        }
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {msg}");
        }
    }

    /// Log a success message.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {} {msg}", "✓".green());
        }
    }

    /// Log a warning message.
    pub fn warning(&self, msg: &str) {
        eprintln!("  {} {msg}", "warning:".yellow().bold());
    }

    /// Log an error message naming the failing stage.
    pub fn error(&self, stage: Option<&str>, msg: &str) {
        match stage {
            Some(stage) => eprintln!("{} {stage}: {msg}", "error:".red().bold()),
            None => eprintln!("{} {msg}", "error:".red().bold()),
        }
    }

    fn progress(&self, current: u64, total: Option<u64>) {
        if self.live {
            let _ = write_progress(&mut io::stderr(), current, total);
        }
    }

    fn end_progress(&self) {
        if self.live {
            let _ = clear_progress(&mut io::stderr());
        }
    }
}

/// Redraw the download line in place.
fn write_progress(w: &mut impl Write, current: u64, total: Option<u64>) -> io::Result<()> {
    let line = match total {
        Some(total) if total > 0 => format!("{} / {}", format_size(current), format_size(total)),
        _ => format_size(current),
    };
    w.queue(MoveToColumn(0))?;
    write!(w, "  {} {line}", "downloading".dark_grey())?;
    w.queue(Clear(ClearType::UntilNewLine))?;
    w.flush()
}

fn clear_progress(w: &mut impl Write) -> io::Result<()> {
    w.queue(MoveToColumn(0))?;
    w.queue(Clear(ClearType::CurrentLine))?;
    w.flush()
}

impl Reporter for Output {
    fn resolved(&self, platform: &Platform, entry: &ArtifactEntry) {
        self.info(&format!(
            "{} {} {}",
            platform.to_string().white().bold(),
            "→".dark_grey(),
            entry.filename()
        ));
    }

    fn downloading(&self, current: u64, total: Option<u64>) {
        self.progress(current, total);
    }

    fn verified(&self, digest: &Sha256Digest) {
        self.end_progress();
        self.success(&format!("sha256 {}", digest.as_str().dark_grey()));
    }

    fn extracting(&self, archive: &str) {
        tracing::debug!(%archive, "extracting");
    }

    fn installing(&self, dest: &Path) {
        tracing::debug!(dest = %dest.display(), "installing");
    }

    fn done(&self, path: &Path, size: u64) {
        self.success(&format!(
            "installed {} {}",
            path.display().to_string().white().bold(),
            format_size(size).dark_grey()
        ));
    }

    fn failed(&self, stage: &str, reason: &str) {
        self.end_progress();
        tracing::debug!(%stage, %reason, "install failed");
    }

    fn warning(&self, msg: &str) {
        Output::warning(self, msg);
    }
}
