use std::sync::{mpsc, Arc};

use picker_logging::{picker_debug, picker_info, picker_warn};

use crate::{PickerEvent, Severity};

/// Destination for pipeline events. Shared by every worker, so `emit`
/// must tolerate concurrent callers.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PickerEvent);
}

/// Writes every event to the global logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: PickerEvent) {
        match event.severity() {
            Severity::Debug => picker_debug!("{event}"),
            Severity::Info => picker_info!("{event}"),
            Severity::Warn => picker_warn!("{event}"),
        }
    }
}

pub struct ChannelSink {
    tx: mpsc::Sender<PickerEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<PickerEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: PickerEvent) {
        let _ = self.tx.send(event);
    }
}

/// Forwards each event to every inner sink, in order.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: PickerEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}
