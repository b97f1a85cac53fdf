use std::fmt;
use std::path::PathBuf;

use picker_core::DownloadTask;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
    Write,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Write => write!(f, "write error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Downloaded { path: PathBuf, bytes: u64 },
    SkippedExisting,
    Failed(FetchError),
}

/// Result of one planned title, keyed by the link's display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub label: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    PageCrawled { url: String, links: usize },
    PageFetchFailed { url: String, error: FetchError },
    LinkUnresolved { page: String, href: String, reason: String },
    TitleRejected { list: String, title: String },
    NoMatch { list: String, title: String },
    Planned(DownloadTask),
    Task(TaskReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warn,
}

impl PickerEvent {
    pub fn severity(&self) -> Severity {
        match self {
            PickerEvent::PageCrawled { .. } => Severity::Debug,
            PickerEvent::PageFetchFailed { .. }
            | PickerEvent::LinkUnresolved { .. }
            | PickerEvent::TitleRejected { .. } => Severity::Warn,
            PickerEvent::Task(TaskReport {
                outcome: Outcome::Failed(_),
                ..
            }) => Severity::Warn,
            PickerEvent::NoMatch { .. } | PickerEvent::Planned(_) | PickerEvent::Task(_) => {
                Severity::Info
            }
        }
    }
}

impl fmt::Display for PickerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerEvent::PageCrawled { url, links } => write!(f, "crawled {url}: {links} links"),
            PickerEvent::PageFetchFailed { url, error } => {
                write!(f, "could not fetch source page {url}: {error}")
            }
            PickerEvent::LinkUnresolved { page, href, reason } => {
                write!(f, "dropped link '{href}' on {page}: {reason}")
            }
            PickerEvent::TitleRejected { list, title } => {
                write!(f, "[{list}] title '{title}' has no usable name")
            }
            PickerEvent::NoMatch { list, title } => write!(f, "[{list}] no match: {title}"),
            PickerEvent::Planned(task) => {
                write!(f, "would download {} -> {}", task.label, task.destination.display())
            }
            PickerEvent::Task(report) => match &report.outcome {
                Outcome::Downloaded { bytes, .. } => {
                    write!(f, "downloaded: {} ({bytes} bytes)", report.label)
                }
                Outcome::SkippedExisting => {
                    write!(f, "skipped (already present): {}", report.label)
                }
                Outcome::Failed(error) => write!(f, "failed: {}: {error}", report.label),
            },
        }
    }
}
