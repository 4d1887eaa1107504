use anyhow::{bail, Result};
use tracing::{debug, error, info, warn};

use bidds_core::{Diagnostics, Severity};
use bidds_io::{convert, ConvertOptions};

use bidds_cli::{BiddsConfig, ConvertArgs};

pub fn handle(args: &ConvertArgs, config: &BiddsConfig) -> Result<()> {
    let options = build_options(args, config);
    info!(
        "Converting {} (resolution {} min, horizon {})",
        options.source.display(),
        options.resolution_minutes,
        options.horizon
    );

    let report = convert(&options)?;
    if report.reused_cache {
        info!("Reused system cache for '{}'", report.system_name);
    }
    if let Some(reason) = &report.cache_warning {
        warn!("System cache skipped: {}", reason);
    }
    info!("System '{}': {}", report.system_name, report.stats);

    replay("network", &report.network_diagnostics);
    replay("time series", &report.time_series_diagnostics);

    let all = report.diagnostics();
    info!("Network document written to {}", options.network_output.display());
    info!(
        "Time-series document written to {}",
        options.time_series_output.display()
    );
    if all.has_issues() {
        info!("Diagnostics: {}", all.summary());
    }

    if args.strict && all.has_errors() {
        bail!(
            "{} component(s) could not be encoded (--strict)",
            all.error_count()
        );
    }
    Ok(())
}

fn build_options(args: &ConvertArgs, config: &BiddsConfig) -> ConvertOptions {
    let mut options = ConvertOptions::new(&args.source, &args.network, &args.time_series);
    options.resolution_minutes = args.resolution.unwrap_or(config.resolution_minutes);
    options.horizon = args.horizon.unwrap_or(config.horizon);
    options.start_time = args.start_time;
    options.reuse = args.reuse || config.reuse;
    options.signals = config.signals.clone();
    options
}

fn replay(pass: &str, diagnostics: &Diagnostics) {
    debug!(
        "{} pass: {} warning(s), {} error(s)",
        pass,
        diagnostics.warning_count(),
        diagnostics.error_count()
    );
    for issue in &diagnostics.issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue),
            Severity::Error => error!("{}", issue),
        }
    }
}
