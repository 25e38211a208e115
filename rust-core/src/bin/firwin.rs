use anyhow::{Context, Result};
use clap::Parser;
use firwin::config::{FilterConfig, Precision};
use firwin::filters::{FilterDesign, FirDesigner};
use firwin::output::{export_csv, CoefficientTable, HalfSequenceTable};
use firwin::spectrum::frequency_response;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "FIR filter design by the window method", long_about = None)]
struct Cli {
    /// JSON filter configuration
    /// Falls back to the built-in highpass/Hamming example when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Decimal places every computed value is rounded to
    #[arg(short, long, default_value_t = Precision::DEFAULT_PLACES)]
    precision: u32,

    /// Export the half-sequence table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the magnitude response on this many frequencies
    #[arg(long, value_name = "POINTS")]
    response: Option<usize>,

    /// Print the half-sequence breakdown instead of the coefficient table
    #[arg(long)]
    half: bool,

    /// Dump the whole design as JSON and exit
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<Value> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", path.display()))
        }
        None => {
            info!("no configuration given, using the built-in example");
            Ok(serde_json::to_value(FilterConfig::reference())?)
        }
    }
}

fn print_diagnostics(design: &FilterDesign) {
    let p = design.parameters;
    println!(
        "delta = {}, AS = {} dB, AP = {} dB, D = {}, alpha = {}",
        p.delta, p.attenuation_db, p.ripple_db, p.d_factor, p.alpha
    );
    println!("N = {}, N_o = {}, n = {}", p.length, p.raw_order, p.half_order);
}

fn print_response(design: &FilterDesign, points: usize) -> Result<()> {
    let response = frequency_response(&design.coefficients, design.sampling_rate_hz, points)?;
    println!("{:>14} {:>12} {:>12}", "frequency_hz", "magnitude", "dB");
    for ((f, m), db) in response
        .frequencies_hz
        .iter()
        .zip(response.magnitude())
        .zip(response.magnitude_db())
    {
        println!("{:>14.4} {:>12.7} {:>12.3}", f, m, db);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let candidate = load_config(cli.config.as_ref())?;
    let precision = Precision::new(cli.precision).context("invalid --precision")?;
    let design = FirDesigner::new(precision)
        .design_value(&candidate)
        .context("filter design failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&design)?);
        return Ok(());
    }

    print_diagnostics(&design);
    if cli.half {
        print!("{}", HalfSequenceTable::new(&design));
    } else {
        print!("{}", CoefficientTable::new(&design.coefficients));
    }

    if let Some(path) = &cli.csv {
        export_csv(&design, path).with_context(|| format!("failed to write {}", path.display()))?;
    }

    if let Some(points) = cli.response {
        print_response(&design, points)?;
    }

    Ok(())
}
