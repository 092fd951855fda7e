//! emx-csv2vcf CLI
//!
//! Convert a CSV contact list into a timestamped vCard file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use emx_csv2vcf::{convert::DEFAULT_INPUT, ConvertError, ConvertReport, Converter};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "emx-csv2vcf")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Convert a CSV file to vCard format")]
struct Cli {
    /// Input CSV file name
    #[arg(long = "csv", value_name = "CSV_FILE", default_value = DEFAULT_INPUT)]
    csv: PathBuf,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match convert(&cli) {
        Ok(report) => {
            println!("vCards have been successfully written to {}.", report.output_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err.downcast_ref::<ConvertError>().map_or(1, ConvertError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn convert(cli: &Cli) -> Result<ConvertReport> {
    let mut converter = Converter::new();
    let report = converter
        .run(&cli.csv)
        .with_context(|| format!("Failed to convert {}", cli.csv.display()))?;
    Ok(report)
}
