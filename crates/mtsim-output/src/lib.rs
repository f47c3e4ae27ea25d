//! `mtsim-output` — optional snapshot/debug CSV output for the
//! micro-traffic simulator.
//!
//! Not part of the provider protocol itself (§6 only crosses
//! `ProviderState`) — this crate is a host-side convenience for inspecting a
//! run after the fact.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mtsim_output::{CsvWriter, ProviderOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = ProviderOutputObserver::new(writer);
//! for tick in 0..n_ticks {
//!     provider.step(dt, tick as f64 * dt, &mut obs);
//! }
//! obs.finish();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ProviderOutputObserver;
pub use row::{TickSummaryRow, VehicleSnapshotRow};
pub use writer::OutputWriter;
