use anyhow::{Context, Result};
use customer_clean::{clean_with, config::Config, io};
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "usage: customer-clean <INPUT> [OUTPUT]";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stderr, so stdout carries only the summary
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) resolve config: file < env < args ────────────────────────
    let mut config = Config::load()?;
    let mut args = env::args().skip(1);
    if let Some(input) = args.next() {
        config.input = Some(input.into());
    }
    if let Some(output) = args.next() {
        config.output = Some(output.into());
    }
    let input = config.input.clone().context(USAGE)?;
    let output = config.output_path().context(USAGE)?;
    let format = config.output_format(&output);

    // ─── 3) load, clean, persist ─────────────────────────────────────
    let table = io::read_table(&input, config.csv_batch_size)?;
    info!(rows = table.num_rows(), columns = table.num_columns(), "loaded {}", input.display());

    let (cleaned, summary) = clean_with(&table, &config.options())
        .with_context(|| format!("cleaning {}", input.display()))?;

    io::write_table(&cleaned, &output, format)?;
    info!(?format, "wrote {}", output.display());

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
