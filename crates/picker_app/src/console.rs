use picker_engine::{EventSink, ListSummary, PickerEvent, Severity};

/// Human-readable progress lines: outcomes on stdout, recoveries on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: PickerEvent) {
        match event.severity() {
            Severity::Debug => {}
            Severity::Info => println!("{event}"),
            Severity::Warn => eprintln!("warning: {event}"),
        }
    }
}

pub(crate) fn summary_line(summary: &ListSummary, dry_run: bool) -> String {
    let mut line = format!(
        "[{}] matched {}, no match {}, skipped {}",
        summary.name, summary.matched, summary.unmatched, summary.skipped
    );
    if dry_run {
        line.push_str(&format!(", would download {}", summary.planned));
    } else {
        line.push_str(&format!(
            ", downloaded {}, failed {}",
            summary.downloaded, summary.failed
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_reflects_mode() {
        let summary = ListSummary {
            name: "gb".to_string(),
            matched: 3,
            unmatched: 1,
            skipped: 1,
            planned: 2,
            downloaded: 1,
            failed: 1,
        };
        assert_eq!(
            summary_line(&summary, false),
            "[gb] matched 3, no match 1, skipped 1, downloaded 1, failed 1"
        );
        assert_eq!(
            summary_line(&summary, true),
            "[gb] matched 3, no match 1, skipped 1, would download 2"
        );
    }
}
