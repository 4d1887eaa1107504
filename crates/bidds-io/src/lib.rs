//! # bidds-io: system import and solver-document export
//!
//! Turns a [`bidds_core::System`] into the two documents the solver reads:
//!
//! - the **network document** (`{"network": {...}}`): one static record per
//!   component, grouped into buckets, plus a fixed violation-cost table
//! - the **time-series document** (`{"time_series_input": {...}}`): a window
//!   of each device's capacity signal and each reserve's requirement
//!
//! ## Quick Start
//!
//! ```no_run
//! use bidds_io::{convert, ConvertOptions};
//!
//! let options = ConvertOptions::new("rts.json", "network.json", "time_series.json");
//! let report = convert(&options)?;
//! for issue in &report.diagnostics().issues {
//!     eprintln!("{issue}");
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Recovery
//!
//! A component that cannot be encoded (unknown category, unresolvable bus,
//! degenerate cost curve, forecast-shaped series) is left out of the
//! documents and reported in the pass's [`bidds_core::Diagnostics`]. Only I/O
//! and descriptor parse failures abort a run.
//!
//! ## Modules
//!
//! - [`importers`] - descriptor loader and serialized-system cache
//! - [`exporters`] - classifier, encoders, windower and document assembly
//! - [`convert`](mod@convert) - the end-to-end entry point

pub mod convert;
pub mod exporters;
pub mod importers;

pub use convert::{convert, ConvertOptions, ConvertReport};
pub use exporters::{
    build_network_document, build_time_series_document, NetworkDocument, SeriesSignals,
    TimeSeriesDocument, TimeSeriesOptions, Translation,
};
pub use importers::load_system;
