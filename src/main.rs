use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use weathersurvey::cli::SurveyArgs;
use weathersurvey::config::LoggingConfig;
use weathersurvey::{Gazetteer, OpenWeatherClient, SurveyError, survey};

/// Rows shown in the preview printed after a run
const PREVIEW_ROWS: usize = 5;

fn init_tracing(logging: &LoggingConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weathersurvey={}", logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(args: SurveyArgs) -> Result<()> {
    let config = args.load_config()?;
    init_tracing(&config.logging);
    info!("weathersurvey v{}", weathersurvey::VERSION);

    let gazetteer = Gazetteer::world();
    if gazetteer.is_empty() {
        return Err(SurveyError::config("The built-in city list is empty").into());
    }
    info!("Loaded {} known cities", gazetteer.len());

    let client = OpenWeatherClient::new(&config.weather)
        .context("Failed to create the weather client")?;
    let date = chrono::Local::now().date_naive();

    let report = survey::run(&config, &gazetteer, &client, args.plots_enabled(), date)
        .await
        .context("Survey run failed")?;

    if report.table.is_empty() {
        warn!("No weather data was collected");
    } else {
        println!("{}", report.table.preview(PREVIEW_ROWS));
    }
    println!(
        "Sampled {} coordinates (seed {}), {} unique cities",
        report.samples, report.seed, report.unique_cities
    );
    println!("Weather lookups: {}", report.summary);
    println!("Table written to {}", report.csv_path.display());
    for path in &report.plots {
        println!("Plot written to {}", path.display());
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: SurveyArgs = argh::from_env();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:?}");
            match e.downcast_ref::<SurveyError>() {
                Some(survey_error) => eprintln!("Error: {}", survey_error.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
