//! Placement traces.
//!
//! Drives a controller over a scripted sequence of scroll offsets and records
//! every decision. Traces serialize to JSONL, one decision per line, so runs
//! can be diffed or checked into fixtures.
//!
//! ```ignore
//! let mut trace = PlacementTrace::new("header");
//! trace.scroll_script(&doc, &mut controller, [0.0, 480.0, 900.0]);
//! println!("{}", trace.to_jsonl());
//! ```

use serde::Serialize;
use sticky_core::{Placement, StickyController, StickyEvent, StickyId};

use crate::document::FakeDocument;

/// One decision for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRecord {
    pub step: usize,
    pub element: usize,
    pub scroll_offset: f64,
    pub placement: Placement,
}

#[derive(Debug, Clone)]
pub struct PlacementTrace {
    run_id: String,
    steps: usize,
    records: Vec<TraceRecord>,
}

impl PlacementTrace {
    #[must_use]
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            steps: 0,
            records: Vec::new(),
        }
    }

    /// Scroll to each offset in turn and dispatch a scroll event to every
    /// managed element, recording the resulting placements.
    pub fn scroll_script(
        &mut self,
        doc: &FakeDocument,
        controller: &mut StickyController<FakeDocument>,
        offsets: impl IntoIterator<Item = f64>,
    ) {
        let ids: Vec<StickyId> = controller.ids().collect();
        for offset in offsets {
            doc.set_scroll(offset);
            let step = self.steps;
            self.steps += 1;
            for &id in &ids {
                if let Some(placement) = controller.handle_event(id, StickyEvent::Scroll) {
                    self.records.push(TraceRecord {
                        step,
                        element: id.index(),
                        scroll_offset: offset,
                        placement,
                    });
                }
            }
            tracing::trace!(run_id = %self.run_id, step, offset, "scroll step recorded");
        }
    }

    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Placements recorded for one element, in step order.
    #[must_use]
    pub fn placements_for(&self, id: StickyId) -> Vec<Placement> {
        self.records
            .iter()
            .filter(|r| r.element == id.index())
            .map(|r| r.placement)
            .collect()
    }

    /// One JSON object per record, each tagged with the run id.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        #[derive(Serialize)]
        struct Line<'a> {
            run_id: &'a str,
            #[serde(flatten)]
            record: &'a TraceRecord,
        }

        let mut out = String::new();
        for record in &self.records {
            let line = Line {
                run_id: &self.run_id,
                record,
            };
            match serde_json::to_string(&line) {
                Ok(json) => {
                    out.push_str(&json);
                    out.push('\n');
                }
                Err(err) => tracing::warn!(%err, "failed to serialize trace record"),
            }
        }
        out
    }
}
