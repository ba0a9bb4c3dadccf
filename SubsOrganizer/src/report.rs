//! Run reports
//!
//! Every warning, skip and per-item failure of a run lands here so callers
//! can audit what happened without scraping log output.

use std::fmt;
use std::path::{Path, PathBuf};

/// Category of a reported event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Target file has no counterpart in the reference tree; file skipped
    MissingReferenceFile,
    /// File could not be parsed; contributes zero entries
    MalformedSourceFile,
    /// Directory or link could not be walked; its subtree is skipped
    UnreadablePath,
    /// Workbook row points at a file that does not exist; row skipped
    MissingTargetFile,
    /// No entry with the row's content id; file still normalized
    EntryNotFound,
    /// Text was changed
    Applied,
    /// Text already matched; nothing to change
    Unchanged,
    /// Output or destination already present
    SkippedExisting,
    /// External converter exited unsuccessfully
    ConverterFailure,
    /// File relocated
    Moved,
    /// File could not be relocated
    MoveFailed,
}

impl ReportKind {
    /// Whether this kind represents something a user should look at
    #[must_use]
    pub fn is_problem(self) -> bool {
        matches!(
            self,
            Self::MissingReferenceFile
                | Self::MalformedSourceFile
                | Self::UnreadablePath
                | Self::MissingTargetFile
                | Self::EntryNotFound
                | Self::ConverterFailure
                | Self::MoveFailed
        )
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingReferenceFile => "missing reference",
            Self::MalformedSourceFile => "malformed",
            Self::UnreadablePath => "unreadable",
            Self::MissingTargetFile => "missing file",
            Self::EntryNotFound => "entry not found",
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::SkippedExisting => "skipped",
            Self::ConverterFailure => "converter failure",
            Self::Moved => "moved",
            Self::MoveFailed => "move failed",
        };
        f.write_str(label)
    }
}

/// A single reported event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEvent {
    pub kind: ReportKind,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}: {}", self.kind, path.display(), self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Ordered collection of events produced during a run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    events: Vec<ReportEvent>,
}

impl RunReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and mirror it to the log
    pub fn push(&mut self, kind: ReportKind, path: Option<&Path>, message: impl Into<String>) {
        let event = ReportEvent {
            kind,
            path: path.map(Path::to_path_buf),
            message: message.into(),
        };

        match kind {
            ReportKind::MissingTargetFile | ReportKind::ConverterFailure | ReportKind::MoveFailed => {
                tracing::error!("{event}");
            }
            ReportKind::MissingReferenceFile
            | ReportKind::MalformedSourceFile
            | ReportKind::UnreadablePath
            | ReportKind::EntryNotFound => tracing::warn!("{event}"),
            ReportKind::Applied
            | ReportKind::Moved
            | ReportKind::Unchanged
            | ReportKind::SkippedExisting => tracing::debug!("{event}"),
        }

        self.events.push(event);
    }

    /// All events in the order they were recorded
    #[must_use]
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// Number of events of the given kind
    #[must_use]
    pub fn count(&self, kind: ReportKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Events of the given kind
    pub fn of_kind(&self, kind: ReportKind) -> impl Iterator<Item = &ReportEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Whether any warning or error was recorded
    #[must_use]
    pub fn has_problems(&self) -> bool {
        self.events.iter().any(|e| e.kind.is_problem())
    }

    /// Append another report's events
    pub fn extend(&mut self, other: RunReport) {
        self.events.extend(other.events);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
