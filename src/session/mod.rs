use chrono::{DateTime, Local};

use crate::client::DiagnosticClient;
use crate::model::{DisplayEntry, Query};
use crate::present::present;

pub const USER_TITLE: &str = "You";
pub const ERROR_TITLE: &str = "Error";
pub const ERROR_MESSAGE: &str = "Could not connect to the diagnostic service";

/// Entry as recorded in the chat log
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEntry {
    pub at: DateTime<Local>,
    pub entry: DisplayEntry,
}

/// Append-only record of everything shown in the chat. Lives in memory only.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<LoggedEntry>,
}

impl MessageLog {
    pub fn append(&mut self, entry: DisplayEntry) {
        self.entries.push(LoggedEntry {
            at: Local::now(),
            entry,
        });
    }

    pub fn entries(&self) -> &[LoggedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What one submission added to the log
#[derive(Debug)]
pub struct Turn<'a> {
    pub entries: &'a [LoggedEntry],
    pub succeeded: bool,
}

/// A chat with the diagnostic service.
///
/// `send` borrows the session mutably for the whole request, so a second
/// submission cannot start until the first one has finished.
#[derive(Debug)]
pub struct ChatSession {
    client: DiagnosticClient,
    log: MessageLog,
}

impl ChatSession {
    pub fn new(client: DiagnosticClient) -> Self {
        Self {
            client,
            log: MessageLog::default(),
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Echo the query, submit it, and log either the presented result or the fixed error entry.
    pub async fn send(&mut self, query: &Query) -> Turn<'_> {
        let start = self.log.len();
        self.log.append(DisplayEntry::new(USER_TITLE, query.as_str()));

        let succeeded = match self.client.submit(query).await {
            Ok(result) => {
                for entry in present(&result) {
                    self.log.append(entry);
                }
                true
            }
            Err(_) => {
                self.log.append(DisplayEntry::new(ERROR_TITLE, ERROR_MESSAGE));
                false
            }
        };

        Turn {
            entries: &self.log.entries()[start..],
            succeeded,
        }
    }
}
