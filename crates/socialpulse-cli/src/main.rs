//! SocialPulse CLI
//!
//! Loads the configured platform datasets, classifies every post for
//! sentiment, mental-health risk and behavior, and reports filtered results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use socialpulse_classifiers::{concatenate_text, ClassificationPipeline, ResultFilter};
use socialpulse_core::{ClassifiedRecord, DataSource, Platform, RawRecord};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod cli;
mod config;
mod report;

use cli::{Cli, Commands, CommonArgs, OutputFormat};
use config::AppConfig;
use report::PlatformReport;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            platform,
            sentiment,
            risk,
            behavior,
            text_out,
            common,
        } => {
            init_logging(common.verbose);
            let metrics = common.metrics.then(init_metrics).transpose()?;

            let mut config = AppConfig::load(&common.config, &common)?;
            if !sentiment.is_empty() {
                config.filter = config.filter.with_sentiments(sentiment);
            }
            if !risk.is_empty() {
                config.filter = config.filter.with_risks(risk);
            }
            if !behavior.is_empty() {
                config.filter = config.filter.with_behaviors(behavior);
            }

            let source = config.data_source();
            let platforms = if platform.is_empty() {
                source.platforms()
            } else {
                platform
            };
            if platforms.is_empty() {
                bail!(
                    "No datasets configured; add a `datasets` section to {}",
                    common.config
                );
            }

            let pipeline = ClassificationPipeline::new(config.pipeline.clone())?;
            let kept = analyze(
                &pipeline,
                &source,
                &platforms,
                &config.filter,
                common.format,
            )
            .await?;

            if let Some(path) = text_out {
                std::fs::write(&path, concatenate_text(&kept))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote text of {} records to {}", kept.len(), path.display());
            }

            print_metrics(metrics.as_ref());
        }

        Commands::Classify {
            text,
            language,
            common,
        } => {
            init_logging(common.verbose);
            let metrics = common.metrics.then(init_metrics).transpose()?;

            let config = AppConfig::load(&common.config, &common)?;
            let pipeline = ClassificationPipeline::new(config.pipeline)?;

            let mut record = RawRecord::new(0, text, Platform::Twitter);
            record.language = language;
            let classified = pipeline.classify(&record).await;

            print_single(&classified, &common)?;
            print_metrics(metrics.as_ref());
        }
    }

    Ok(())
}

/// Classify each platform in turn, printing its report. Returns the records
/// that passed the filter across all platforms.
async fn analyze(
    pipeline: &ClassificationPipeline,
    source: &dyn DataSource,
    platforms: &[Platform],
    filter: &ResultFilter,
    format: OutputFormat,
) -> Result<Vec<ClassifiedRecord>> {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing with partial results");
            trigger.cancel();
        }
    });

    let mut kept = Vec::new();
    for &platform in platforms {
        let records = source
            .load(platform)
            .with_context(|| format!("Failed to load {platform} dataset"))?;

        let batch = pipeline.classify_all_with_cancel(&records, &cancel).await?;
        let filtered = filter.apply(&batch.records);

        let report = PlatformReport::new(platform, &batch, &filtered);
        match format {
            OutputFormat::Table => println!("{}", report.to_table()),
            OutputFormat::Json => println!("{}", report.to_json()?),
        }

        kept.extend(filtered);
        if batch.cancelled {
            break;
        }
    }

    Ok(kept)
}

fn print_single(record: &ClassifiedRecord, common: &CommonArgs) -> Result<()> {
    match common.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Table => {
            println!("Sentiment: {} ({:+.3})", record.sentiment, record.metadata.polarity);
            println!("Risk:      {}", record.risk);
            println!("Behavior:  {}", record.behavior);
            if record.metadata.translation.is_degraded() {
                println!("Note:      scored from untranslated text");
            }
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("socialpulse=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("socialpulse=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics recorder and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "socialpulse_records_classified_total",
        "Total number of records classified"
    );
    metrics::describe_counter!(
        "socialpulse_translation_degraded_total",
        "Records scored from untranslated text, by reason"
    );
    metrics::describe_histogram!(
        "socialpulse_record_latency_us",
        metrics::Unit::Microseconds,
        "Per-record classification latency in microseconds"
    );

    Ok(handle)
}

fn print_metrics(handle: Option<&PrometheusHandle>) {
    if let Some(handle) = handle {
        eprintln!("{}", handle.render());
    }
}
