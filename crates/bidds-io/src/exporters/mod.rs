//! Solver-input exporters.
//!
//! The network pass runs classifier → encoder → bucket for every component;
//! the series pass runs the windower over the same components. See
//! [`document`] for the two entry points.

pub mod branches;
pub mod classify;
pub mod devices;
pub mod document;
pub mod encoders;
pub mod schema;
pub mod storage;
pub mod time_series;

pub use classify::{classify, NetworkBucket};
pub use document::{
    build_network_document, build_time_series_document, document_to_string, write_document,
    NetworkDocument, TimeSeriesDocument, TimeSeriesOptions, Translation, ViolationCost,
};
pub use encoders::{encode_component, EncodeContext, EncodeError, EncodeResult};
pub use time_series::{window_component, SeriesSignals, TimeWindow};
