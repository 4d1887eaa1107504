//! Conversion entry point: descriptor in, two solver documents out.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use bidds_core::{Diagnostics, System, SystemStats};
use chrono::NaiveDateTime;

use crate::exporters::{
    build_network_document, build_time_series_document, write_document, SeriesSignals,
    TimeSeriesOptions,
};
use crate::importers::{
    cache_is_current, cache_path, load_system, load_system_cache, write_system_cache,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub source: PathBuf,
    pub network_output: PathBuf,
    pub time_series_output: PathBuf,
    pub resolution_minutes: u32,
    /// Window length `T`
    pub horizon: usize,
    /// Defaults to the earliest single series in the system
    pub start_time: Option<NaiveDateTime>,
    /// Load `<source>.system.json` instead of the descriptor when it is not
    /// older than the descriptor
    pub reuse: bool,
    pub signals: SeriesSignals,
}

impl ConvertOptions {
    pub fn new(
        source: impl Into<PathBuf>,
        network_output: impl Into<PathBuf>,
        time_series_output: impl Into<PathBuf>,
    ) -> Self {
        let defaults = TimeSeriesOptions::default();
        Self {
            source: source.into(),
            network_output: network_output.into(),
            time_series_output: time_series_output.into(),
            resolution_minutes: defaults.resolution_minutes,
            horizon: defaults.steps,
            start_time: None,
            reuse: false,
            signals: defaults.signals,
        }
    }

    fn time_series_options(&self) -> TimeSeriesOptions {
        TimeSeriesOptions {
            steps: self.horizon,
            resolution_minutes: self.resolution_minutes,
            start_time: self.start_time,
            signals: self.signals.clone(),
        }
    }
}

/// Outcome of one run. Partial coverage shows up only in the diagnostics.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub system_name: String,
    pub stats: SystemStats,
    /// The system came from the cache rather than the descriptor
    pub reused_cache: bool,
    /// Cache read or write failure; the run went on without it
    pub cache_warning: Option<String>,
    pub network_diagnostics: Diagnostics,
    pub time_series_diagnostics: Diagnostics,
}

impl ConvertReport {
    /// Diagnostics of both passes, network pass first
    pub fn diagnostics(&self) -> Diagnostics {
        let mut all = self.network_diagnostics.clone();
        all.merge(self.time_series_diagnostics.clone());
        all
    }

    pub fn has_errors(&self) -> bool {
        self.network_diagnostics.has_errors() || self.time_series_diagnostics.has_errors()
    }
}

/// Load (or reuse) the system, then write both documents.
///
/// Only I/O and descriptor failures are errors; per-component problems are
/// returned in the report.
pub fn convert(options: &ConvertOptions) -> Result<ConvertReport> {
    if options.resolution_minutes == 0 {
        bail!("time series resolution must be at least one minute");
    }

    let obtained = obtain_system(&options.source, options.reuse)?;
    let system = obtained.system;

    let network = build_network_document(&system);
    write_document(&network.document, &options.network_output)?;

    let series = build_time_series_document(&system, &options.time_series_options());
    write_document(&series.document, &options.time_series_output)?;

    Ok(ConvertReport {
        system_name: system.name.clone(),
        stats: system.stats(),
        reused_cache: obtained.reused_cache,
        cache_warning: obtained.cache_warning,
        network_diagnostics: network.diagnostics,
        time_series_diagnostics: series.diagnostics,
    })
}

struct ObtainedSystem {
    system: System,
    reused_cache: bool,
    cache_warning: Option<String>,
}

/// The cache is best-effort: a stale, unreadable or unwritable cache never
/// stops a run that can read the descriptor.
fn obtain_system(source: &Path, reuse: bool) -> Result<ObtainedSystem> {
    let cache = cache_path(source);
    let mut cache_warning = None;
    if reuse && cache_is_current(source, &cache) {
        match load_system_cache(&cache) {
            Ok(system) => {
                return Ok(ObtainedSystem {
                    system,
                    reused_cache: true,
                    cache_warning,
                })
            }
            Err(e) if source.exists() => cache_warning = Some(format!("{e:#}")),
            Err(e) => return Err(e),
        }
    }

    let system = load_system(source)?;
    if let Err(e) = write_system_cache(&system, &cache) {
        cache_warning = Some(format!("{e:#}"));
    }
    Ok(ObtainedSystem {
        system,
        reused_cache: false,
        cache_warning,
    })
}
