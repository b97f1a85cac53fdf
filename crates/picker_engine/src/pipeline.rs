use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use picker_core::{existing_keys, plan, Config, ConfigError, LinkCatalog, Normalizer, TitleSet};
use picker_logging::picker_info;
use thiserror::Error;

use crate::crawl::crawl;
use crate::persist::{ensure_output_dir, existing_file_names, PersistError};
use crate::scheduler::{FetchScheduler, DEFAULT_TASK_TIMEOUT};
use crate::{
    EventSink, FetchSettings, Fetcher, Outcome, PickerEvent, ReqwestFetcher, TaskReport,
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("destination {path:?} is unusable: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
}

/// Raw titles for one platform or category, already loaded by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleList {
    pub name: String,
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSummary {
    pub name: String,
    pub matched: usize,
    pub unmatched: usize,
    pub skipped: usize,
    pub planned: usize,
    pub downloaded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub page_settings: FetchSettings,
    pub download_settings: FetchSettings,
    pub task_timeout: Duration,
    /// Stop after planning; report what would be downloaded.
    pub dry_run: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            page_settings: FetchSettings::for_pages(),
            download_settings: FetchSettings::for_downloads(),
            task_timeout: DEFAULT_TASK_TIMEOUT,
            dry_run: false,
        }
    }
}

pub struct Pipeline {
    config: Arc<Config>,
    page_fetcher: Arc<dyn Fetcher>,
    scheduler: FetchScheduler,
    sink: Arc<dyn EventSink>,
    dry_run: bool,
}

impl Pipeline {
    pub fn new(config: Arc<Config>, sink: Arc<dyn EventSink>, options: PipelineOptions) -> Self {
        let page_fetcher = Arc::new(ReqwestFetcher::new(options.page_settings));
        let file_fetcher = Arc::new(ReqwestFetcher::new(options.download_settings));
        Self::with_fetchers(
            config,
            page_fetcher,
            file_fetcher,
            sink,
            options.task_timeout,
            options.dry_run,
        )
    }

    pub fn with_fetchers(
        config: Arc<Config>,
        page_fetcher: Arc<dyn Fetcher>,
        file_fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn EventSink>,
        task_timeout: Duration,
        dry_run: bool,
    ) -> Self {
        let scheduler = FetchScheduler::new(file_fetcher, sink.clone(), config.throttle, task_timeout);
        Self {
            config,
            page_fetcher,
            scheduler,
            sink,
            dry_run,
        }
    }

    /// Processes every list in order.
    ///
    /// Configuration problems for any list are reported before anything is
    /// crawled, and an empty `lists` is itself an error.
    pub async fn run(
        &self,
        lists: &[TitleList],
        dest_root: &Path,
    ) -> Result<Vec<ListSummary>, PipelineError> {
        if lists.is_empty() {
            return Err(ConfigError::NoTitleLists.into());
        }
        self.config.validate()?;
        for list in lists {
            self.config.source_for(&list.name)?;
        }
        ensure_output_dir(dest_root).map_err(|source| PipelineError::Destination {
            path: dest_root.to_path_buf(),
            source,
        })?;

        let mut summaries = Vec::with_capacity(lists.len());
        for list in lists {
            summaries.push(self.process_list(list, dest_root).await?);
        }
        Ok(summaries)
    }

    pub async fn process_list(
        &self,
        list: &TitleList,
        dest_root: &Path,
    ) -> Result<ListSummary, PipelineError> {
        let source = self.config.source_for(&list.name)?;
        let normalizer = Normalizer::new(self.config.allow_prerelease);
        let destination = dest_root.join(&list.name);
        let mut summary = ListSummary {
            name: list.name.clone(),
            ..ListSummary::default()
        };

        let titles = TitleSet::build(list.titles.iter().map(String::as_str), &normalizer);
        for title in &titles.rejected {
            self.sink.emit(PickerEvent::TitleRejected {
                list: list.name.clone(),
                title: title.clone(),
            });
        }

        picker_info!(
            "[{}] crawling {} source page(s) for {} title(s)",
            list.name,
            source.urls.len(),
            titles.keys.len()
        );
        let links = crawl(self.page_fetcher.as_ref(), &source.urls, self.sink.as_ref()).await;
        let catalog = LinkCatalog::build(&links, &self.config);
        picker_info!(
            "[{}] {} link(s) found, {} selectable name(s)",
            list.name,
            links.len(),
            catalog.len()
        );

        for title in &titles.keys {
            if catalog.contains(&title.key) {
                summary.matched += 1;
            } else {
                summary.unmatched += 1;
                self.sink.emit(PickerEvent::NoMatch {
                    list: list.name.clone(),
                    title: title.title.clone(),
                });
            }
        }

        let existing = if source.cross_check {
            let names = existing_file_names(&destination).map_err(|err| {
                PipelineError::Destination {
                    path: destination.clone(),
                    source: err,
                }
            })?;
            existing_keys(names.iter().map(String::as_str), &normalizer)
        } else {
            HashSet::new()
        };

        let plan = plan(
            &titles.ordered_keys(),
            &catalog,
            &existing,
            source.cross_check,
            &destination,
        );
        summary.skipped = plan.skipped_existing.len();
        summary.planned = plan.tasks.len();
        for label in plan.skipped_existing {
            self.sink.emit(PickerEvent::Task(TaskReport {
                label,
                outcome: Outcome::SkippedExisting,
            }));
        }

        if self.dry_run {
            for task in plan.tasks {
                self.sink.emit(PickerEvent::Planned(task));
            }
            return Ok(summary);
        }
        if plan.tasks.is_empty() {
            return Ok(summary);
        }

        ensure_output_dir(&destination).map_err(|err| PipelineError::Destination {
            path: destination.clone(),
            source: err,
        })?;
        for report in self.scheduler.run(plan.tasks).await {
            match report.outcome {
                Outcome::Downloaded { .. } => summary.downloaded += 1,
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::SkippedExisting => summary.skipped += 1,
            }
        }
        Ok(summary)
    }
}
