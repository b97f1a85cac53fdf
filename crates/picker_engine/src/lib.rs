//! Picker engine: crawling, downloading and the per-list pipeline.
mod crawl;
mod decode;
mod fetch;
mod links;
mod persist;
mod pipeline;
mod scheduler;
mod sink;
mod types;

pub use crawl::crawl;
pub use decode::{decode_page, DecodedPage};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use links::{extract_links, LinkExtraction, UnresolvedLink};
pub use persist::{
    ensure_output_dir, existing_file_names, AtomicFileWriter, PendingFile, PersistError,
};
pub use pipeline::{ListSummary, Pipeline, PipelineError, PipelineOptions, TitleList};
pub use scheduler::{FetchScheduler, DEFAULT_TASK_TIMEOUT};
pub use sink::{ChannelSink, EventSink, FanoutSink, LogSink};
pub use types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, Outcome, PickerEvent, Severity,
    TaskReport,
};
