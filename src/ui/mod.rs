use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

use crate::session::LoggedEntry;

/// Prompt for symptoms. Returns `None` once stdin is closed.
pub fn read_input(input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("\nYou > ");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

pub fn is_quit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit")
}

/// Display welcome message
pub fn display_welcome(endpoint: &str) {
    println!();
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                          medchat                              ║");
    println!("║                Symptom check chat client                      ║");
    println!("╠═══════════════════════════════════════════════════════════════╣");
    println!("║  Describe how you feel and the diagnostic service will        ║");
    println!("║  answer with a detected condition, an urgency level and the   ║");
    println!("║  medications that should be avoided for it.                   ║");
    println!("║                                                               ║");
    println!("║          WARNING: This is NOT a diagnosis tool.               ║");
    println!("║     Always consult a medical professional for proper          ║");
    println!("║     diagnosis and treatment.                                  ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!("Service: {}", endpoint);
    println!("Type 'q' to quit.");
}

/// Tracks the spinner shown while a request is in flight.
///
/// Also serves as the log writer: while a spinner is active, log lines are
/// printed with the spinner suspended so the two never share a terminal line.
#[derive(Clone, Default)]
pub struct Activity {
    current: Arc<Mutex<Option<ProgressBar>>>,
}

impl Activity {
    /// Show the spinner in place of the prompt until the returned guard is dropped
    pub fn start(&self) -> Waiting {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Waiting for the diagnostic service...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut current) = self.current.lock() {
            *current = Some(spinner.clone());
        }

        Waiting {
            spinner,
            activity: self.clone(),
        }
    }

    fn spinner(&self) -> Option<ProgressBar> {
        self.current.lock().ok().and_then(|current| current.clone())
    }
}

/// Clears the spinner on drop, whatever the outcome of the request
pub struct Waiting {
    spinner: ProgressBar,
    activity: Activity,
}

impl Drop for Waiting {
    fn drop(&mut self) {
        if let Ok(mut current) = self.activity.current.lock() {
            *current = None;
        }
        self.spinner.finish_and_clear();
    }
}

pub struct LogWriter {
    spinner: Option<ProgressBar>,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| io::stderr().write_all(buf))?,
            None => io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for Activity {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            spinner: self.spinner(),
        }
    }
}

pub fn display_entries(entries: &[LoggedEntry]) {
    for logged in entries {
        println!("{}", format_entry(logged));
    }
}

/// `[HH:MM:SS] Title: body`, with multi-line bodies as a bulleted list
pub fn format_entry(logged: &LoggedEntry) -> String {
    let time = logged.at.format("%H:%M:%S");
    let entry = &logged.entry;

    let mut lines = entry.body.lines();
    match (lines.next(), lines.next()) {
        (Some(_), Some(_)) => {
            let items: Vec<String> = entry.body.lines().map(|l| format!("    - {}", l)).collect();
            format!("[{}] {}:\n{}", time, entry.title, items.join("\n"))
        }
        _ => format!("[{}] {}: {}", time, entry.title, entry.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DisplayEntry;
    use chrono::{Local, TimeZone};
    use std::io::Cursor;

    fn logged(title: &str, body: &str) -> LoggedEntry {
        LoggedEntry {
            at: Local.with_ymd_and_hms(2026, 3, 1, 9, 5, 7).unwrap(),
            entry: DisplayEntry::new(title, body),
        }
    }

    #[test]
    fn single_line_entry_renders_inline() {
        assert_eq!(
            format_entry(&logged("Detected condition", "asma")),
            "[09:05:07] Detected condition: asma"
        );
    }

    #[test]
    fn multi_line_entry_renders_as_list() {
        assert_eq!(
            format_entry(&logged(
                "Medications not recommended",
                "propranolol (85.7%)\naspirina (71.4%)"
            )),
            "[09:05:07] Medications not recommended:\n    - propranolol (85.7%)\n    - aspirina (71.4%)"
        );
    }

    #[test]
    fn reads_trimmed_lines_until_eof() {
        let mut input = Cursor::new("  dolor de pecho \n");
        assert_eq!(
            read_input(&mut input).unwrap().as_deref(),
            Some("dolor de pecho")
        );
        assert_eq!(read_input(&mut input).unwrap(), None);
    }

    #[test]
    fn spinner_is_tracked_only_while_waiting() {
        let activity = Activity::default();
        assert!(activity.make_writer().spinner.is_none());

        let waiting = activity.start();
        assert!(activity.current.lock().unwrap().is_some());
        let mut writer = activity.make_writer();
        assert!(writer.spinner.is_some());
        writer.write_all(b"log line written above the spinner\n").unwrap();

        drop(waiting);
        assert!(activity.current.lock().unwrap().is_none());
        assert!(activity.make_writer().spinner.is_none());
    }

    #[test]
    fn quit_words() {
        assert!(is_quit("q"));
        assert!(is_quit("EXIT"));
        assert!(!is_quit("tos"));
        assert!(!is_quit(""));
    }
}
