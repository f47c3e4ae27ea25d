//! `ProviderOutputObserver<W>` — bridges `ProviderObserver` to an
//! `OutputWriter`.

use mtsim_actor::VehicleState;
use mtsim_provider::ProviderObserver;

use crate::row::{TickSummaryRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`ProviderObserver`] that writes vehicle snapshots and tick summaries to
/// any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `ProviderObserver`
/// methods have no return value. Check for errors with
/// [`take_error`][Self::take_error] after the run loop ends, then call
/// [`finish`][Self::finish] — `Provider` has no "run end" hook of its own,
/// since the host drives `step` directly.
pub struct ProviderOutputObserver<W: OutputWriter> {
    writer: W,
    tick: u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ProviderOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, tick: 0, last_error: None }
    }

    /// Take the stored write error (if any) after the run loop returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the underlying writer. Safe to call more than once.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> ProviderObserver for ProviderOutputObserver<W> {
    fn on_tick_start(&mut self, _sim_time: f64) {
        self.tick += 1;
    }

    fn on_tick_end(&mut self, sim_time: f64, state: &[VehicleState]) {
        let rows: Vec<VehicleSnapshotRow> = state
            .iter()
            .map(|v| VehicleSnapshotRow {
                tick: self.tick,
                sim_time,
                actor_id: v.id.0,
                x: v.position.x,
                y: v.position.y,
                heading: v.heading,
                speed: v.speed,
                role: v.role.as_str().to_string(),
                source: v.source.clone(),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }

        let summary = TickSummaryRow { tick: self.tick, sim_time, owned_count: state.len() as u64 };
        let result = self.writer.write_tick_summary(&summary);
        self.store_err(result);
    }
}
