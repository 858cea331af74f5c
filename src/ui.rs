//! Terminal output: a progress bar over the classification budget and
//! coloured one-line summaries.
//!
//! Uses `indicatif` for the bar and `console` for styling. Diagnostics go
//! through `tracing`, whose output is routed through [`LogWriter`] so log
//! lines are printed above the bar instead of tearing through it.

use std::io::{self, Write};
use std::path::Path;

use console::Style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::records::SaveOutcome;

/// Progress over the classification calls of one batch.
pub struct BatchProgress {
    pb: ProgressBar,
    green: Style,
    dim: Style,
}

impl BatchProgress {
    /// Starts a bar sized to the classification budget, drawn by `multi`.
    pub fn start(multi: &MultiProgress, budget: usize) -> Self {
        let pb = multi.add(ProgressBar::new(budget as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Records one classified title.
    pub fn advance(&self, title: &str, relevant: bool) {
        let mark = if relevant {
            self.green.apply_to("✓")
        } else {
            self.dim.apply_to("·")
        };
        self.pb.set_message(format!("{mark} {title}"));
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

/// Stderr writer for the tracing subscriber that suspends every bar of
/// `multi` while a log line is written.
#[derive(Clone)]
pub struct LogWriter {
    multi: MultiProgress,
}

impl LogWriter {
    pub fn new(multi: MultiProgress) -> Self {
        Self { multi }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.multi.suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Prints the outcome of writing a CSV file.
pub fn print_saved(path: &Path, outcome: SaveOutcome, what: &str) {
    match outcome {
        SaveOutcome::Written(count) => {
            let green = Style::new().green().bold();
            println!(
                "  {} Saved {count} {what} to {}",
                green.apply_to("✓"),
                path.display()
            );
        }
        SaveOutcome::Skipped => {
            let yellow = Style::new().yellow();
            println!("  {} No {what} found, nothing written", yellow.apply_to("!"));
        }
    }
}

/// Prints a failure that ended a step without crashing the process.
pub fn print_failure(message: &str) {
    let red = Style::new().red().bold();
    eprintln!("  {} {message}", red.apply_to("✗"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn log_writer_accepts_whole_lines_while_bar_is_active() {
        let multi = hidden();
        let progress = BatchProgress::start(&multi, 3);
        let mut writer = LogWriter::new(multi.clone());

        let line = b"INFO jobsift: evaluating job\n";
        assert_eq!(writer.write(line).unwrap(), line.len());
        writer.flush().unwrap();
        progress.finish();
    }

    #[test]
    fn advance_counts_classified_titles() {
        let multi = hidden();
        let progress = BatchProgress::start(&multi, 2);
        progress.advance("Rust Developer", true);
        progress.advance("Web Designer", false);
        assert_eq!(progress.pb.position(), 2);
        assert_eq!(progress.pb.length(), Some(2));
        progress.finish();
        assert!(progress.pb.is_finished());
    }
}
