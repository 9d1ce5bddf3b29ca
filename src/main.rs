use job_radar::config::load_config;
use job_radar::logging::{init_logging, DEFAULT_LOG_FILE};
use job_radar::pipeline::Pipeline;
use job_radar::schedule::{delay_until, next_run_at};
use job_radar::scraper::HttpClient;
use job_radar::storage::SqliteStorage;
use chrono::{Local, TimeDelta};
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let mut config_path = "config.json".to_string();
    let mut log_file = PathBuf::from(DEFAULT_LOG_FILE);
    let mut once = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--once" => once = true,
            "--log-file" => {
                if let Some(path) = args.next() {
                    log_file = PathBuf::from(path);
                }
            }
            path => config_path = path.to_string(),
        }
    }

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&log_file);

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {:?}", panic_info);
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from file
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({}): {}", config_path, e);
            return;
        }
    };

    let client = match HttpClient::new(&config.user_agent, config.request_timeout_seconds) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let pipeline = match Pipeline::from_config(&config, client) {
        Ok(p) => p,
        Err(e) => {
            error!("Invalid pipeline configuration: {}", e);
            return;
        }
    };

    let mut storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    info!("Service started. Executing initial run...");
    loop {
        match pipeline.run(&mut storage).await {
            Ok(report) => {
                info!(
                    "Run finished: {} fetched, {} relevant, {} saved",
                    report.fetched(),
                    report.relevant(),
                    report.saved
                );
                for (category, count) in &report.categories {
                    info!("  {}: {}", category, count);
                }
                for source in report.sources.iter().filter(|s| s.error.is_some()) {
                    warn!("Source {} failed this run", source.name);
                }
            }
            Err(e) => error!("Critical error in pipeline: {}", e),
        }

        if once {
            break;
        }

        let now = Local::now();
        let next = next_run_at(&now, &config.schedule, &mut rand::rng()).unwrap_or_else(|| {
            warn!("Could not compute next run time, retrying in 24 hours");
            now + TimeDelta::days(1)
        });
        let wait = delay_until(&now, &next);
        info!(
            "Sleeping... next run scheduled for {} ({:.2} hours)",
            next,
            wait.as_secs_f64() / 3600.0
        );

        tokio::select! {
            _ = sleep(wait) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested.");
                break;
            }
        }
    }
}
