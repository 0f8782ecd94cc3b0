use tracing::{error, info, warn};
use weekday_align::analyzer::{align, DataReport, SeriesIndicators};
use weekday_align::config::{load_config, AppConfig};
use weekday_align::exam::{assemble_exam, copy_single_question};
use weekday_align::loader::{load_primary_csv, load_secondary_csv};
use weekday_align::model::AlignedPair;
use weekday_align::storage::SqliteStorage;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::var("WEEKDAY_ALIGN_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let Some(aligned) = run_series(&config) else {
        return;
    };

    let lags = config.cross_correlation_lags;
    info!("Cross-correlation of daily changes (lags -{}..={}):", lags, lags);
    let ccf = SeriesIndicators::cross_analysis(&aligned, lags);
    for (lag, corr) in &ccf {
        match corr {
            Some(c) => info!("  lag {:>3}: {:+.4}", lag, c),
            None => info!("  lag {:>3}: n/a", lag),
        }
    }
    if let Some((lag, c)) = SeriesIndicators::strongest_lag(&ccf) {
        info!("Strongest cross-correlation at lag {} ({:+.4})", lag, c);
    }

    if let Some(exam) = &config.exam {
        info!("Generating question files under {}...", exam.root.display());
        match assemble_exam(&exam.root, &exam.categories, &exam.options) {
            Ok(files) => info!("Generated {} category files", files.len()),
            Err(e) => warn!("Exam assembly failed: {}", e),
        }
    }

    if let Some(quiz) = &config.quiz {
        if let Err(e) = copy_single_question(&quiz.source, &quiz.question, &quiz.dest) {
            warn!("Quiz copy failed: {}", e);
        }
    }

    info!("Done.");
}

/// Loads, aligns, reports and persists both series.
fn run_series(config: &AppConfig) -> Option<AlignedPair> {
    info!("Loading {} from {}...", config.primary.name, config.primary.path.display());
    let primary = match load_primary_csv(&config.primary) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load primary series: {}", e);
            return None;
        }
    };

    info!("Loading {} from {}...", config.secondary.name, config.secondary.path.display());
    let secondary = match load_secondary_csv(&config.secondary) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load secondary series: {}", e);
            return None;
        }
    };

    let aligned = match align(&primary.series, &secondary.series, config.align) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Alignment failed: {}", e);
            return None;
        }
    };
    info!("Aligned {} days ({:?}), {} imputed", aligned.len(), config.align, aligned.imputed);

    let report = DataReport::build(&secondary.raw, &primary.series, &secondary.series, &aligned);
    for line in report.to_string().lines() {
        info!("{}", line);
    }

    match SqliteStorage::new(&config.database_path) {
        Ok(mut storage) => {
            for series in [&aligned.primary, &aligned.secondary] {
                if let Err(e) = storage.save_series(series) {
                    warn!("Failed to save {}: {}", series.name, e);
                }
            }
            if let Err(e) = storage.save_report(&report) {
                warn!("Failed to save data report: {}", e);
            }
        }
        Err(e) => warn!("Failed to initialize storage: {}", e),
    }

    Some(aligned)
}
