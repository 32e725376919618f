//! Event recording for simulation runs.
//!
//! A `tracing` subscriber turns every info event into a row of a table named
//! after the event's target. Columns come from the event's fields, so the
//! schema is whatever the simulation emits. Tables can be inspected directly,
//! converted to polars DataFrames, or written out as parquet.
//!
//! # Usage
//!
//! ```ignore
//! // In simulation code:
//! tracing::info!(target: "death", day, cause = cause.as_str());
//!
//! // In a test:
//! instrument::install_subscriber();
//! // ... run days ...
//! let recorder = instrument::drain();
//! let by_cause = recorder.count_by("death", "cause");
//! ```

mod export;
mod subscriber;
mod table;

pub use export::{ScopedRecorder, drain_to_dataframes, save_parquet};
pub use subscriber::{DataFrameSubscriber, clear, drain, install_subscriber};
pub use table::{Cell, DynamicTable, Recorder, TypedColumn};
