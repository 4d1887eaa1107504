//! Error type for building systems.
//!
//! Per-component encoding failures are not errors at this level: they end up
//! in [`crate::Diagnostics`]. [`BiddsError`] covers inconsistencies that make
//! a system unusable as a whole. File and parse failures belong to the loaders
//! in `bidds-io`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiddsError {
    /// Inconsistent system data (duplicate names or bus numbers, dangling series)
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type BiddsResult<T> = Result<T, BiddsError>;
