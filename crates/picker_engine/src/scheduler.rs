use std::sync::Arc;
use std::time::Duration;

use picker_core::DownloadTask;
use picker_logging::{picker_debug, picker_error};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::{EventSink, FailureKind, FetchError, Fetcher, Outcome, PickerEvent, TaskReport};

pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Fixed pool of `throttle` workers draining a bounded task queue.
///
/// Tasks are queued in plan order; completion order is unspecified. A failed
/// task is reported once and never retried or allowed to stop its siblings.
/// The timeout bounds each task's transfer; the final rename is not
/// interruptible, so a reported outcome always matches the disk.
pub struct FetchScheduler {
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn EventSink>,
    throttle: usize,
    task_timeout: Duration,
}

impl FetchScheduler {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn EventSink>,
        throttle: usize,
        task_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            sink,
            throttle: throttle.max(1),
            task_timeout,
        }
    }

    pub fn throttle(&self) -> usize {
        self.throttle
    }

    /// Runs every task to completion and returns the reports in completion order.
    pub async fn run(&self, tasks: Vec<DownloadTask>) -> Vec<TaskReport> {
        if tasks.is_empty() {
            return Vec::new();
        }
        let workers = self.throttle.min(tasks.len());
        let (task_tx, task_rx) = mpsc::channel::<DownloadTask>(self.throttle);
        let queue = Arc::new(Mutex::new(task_rx));

        let mut pool = JoinSet::new();
        for worker in 0..workers {
            let queue = queue.clone();
            let fetcher = self.fetcher.clone();
            let sink = self.sink.clone();
            let timeout = self.task_timeout;
            pool.spawn(async move {
                let mut reports = Vec::new();
                loop {
                    let next = queue.lock().await.recv().await;
                    let Some(task) = next else {
                        break;
                    };
                    picker_debug!("worker {worker} fetching {}", task.url);
                    let report = execute(fetcher.as_ref(), &task, timeout).await;
                    sink.emit(PickerEvent::Task(report.clone()));
                    reports.push(report);
                }
                reports
            });
        }

        for task in tasks {
            if task_tx.send(task).await.is_err() {
                picker_error!("download queue closed before all tasks were submitted");
                break;
            }
        }
        drop(task_tx);

        let mut reports = Vec::new();
        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(worker_reports) => reports.extend(worker_reports),
                Err(err) => picker_error!("download worker stopped unexpectedly: {err}"),
            }
        }
        reports
    }
}

async fn execute(fetcher: &dyn Fetcher, task: &DownloadTask, timeout: Duration) -> TaskReport {
    let outcome = match download(fetcher, task, timeout).await {
        Ok(outcome) => outcome,
        Err(error) => Outcome::Failed(error),
    };
    TaskReport {
        label: task.label.clone(),
        outcome,
    }
}

/// Streams the body into a temp file under `timeout`, then renames it into
/// place. A task that fails or times out leaves nothing at its destination.
async fn download(
    fetcher: &dyn Fetcher,
    task: &DownloadTask,
    timeout: Duration,
) -> Result<Outcome, FetchError> {
    let (writer, filename) = AtomicFileWriter::for_path(&task.destination).map_err(write_error)?;
    let pending = writer.begin(&filename).map_err(write_error)?;
    let mut file = pending.async_handle().map_err(write_error)?;

    let transfer = fetcher.fetch_to(&task.url, &mut file);
    let metadata = match tokio::time::timeout(timeout, transfer).await {
        Ok(fetched) => fetched?,
        Err(_) => {
            return Err(FetchError::new(
                FailureKind::Timeout,
                format!("task exceeded {}s", timeout.as_secs_f32()),
            ))
        }
    };
    drop(file);

    let path = tokio::task::spawn_blocking(move || pending.commit())
        .await
        .map_err(|err| FetchError::new(FailureKind::Write, err.to_string()))?
        .map_err(write_error)?;
    Ok(Outcome::Downloaded {
        path,
        bytes: metadata.byte_len,
    })
}

fn write_error(err: PersistError) -> FetchError {
    FetchError::new(FailureKind::Write, err.to_string())
}
