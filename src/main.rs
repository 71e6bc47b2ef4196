use std::io::{self, Read, Write};

use anyhow::Context;
use clap::Parser;
use pattern_scan::{
    load, load_from_reader, telemetry, write_report, ProviderRegistry, ScanConfig, Scanner,
    Source, DEFAULT_PROVIDERS,
};

/// Scan daily bar series for head-and-shoulders patterns and print a JSON report.
///
/// Input is a JSON object mapping symbol to an array of `{t, o, h, l, c}` bars.
#[derive(Parser, Debug)]
#[command(name = "pattern-scan", version, about)]
struct Cli {
    /// Input file; `-` or nothing reads standard input
    input: Option<String>,

    /// Pattern providers to try, in order
    #[arg(
        long = "detector",
        value_name = "NAME",
        env = "PATTERN_SCAN_DETECTORS",
        value_delimiter = ',',
        default_values_t = DEFAULT_PROVIDERS.iter().map(|p| p.to_string()).collect::<Vec<_>>()
    )]
    detectors: Vec<String>,

    /// Disable pattern detection (overrides --detector)
    #[arg(long)]
    no_detect: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn scan_config(&self) -> ScanConfig {
        if self.no_detect {
            ScanConfig::without_detection()
        } else {
            ScanConfig::with_providers(self.detectors.iter().cloned())
        }
    }
}

/// Load, scan and write one report. Only a failure to read or parse the input, or to
/// write the report, is an error.
fn run<R: Read, W: Write>(cli: &Cli, stdin: R, stdout: W) -> anyhow::Result<()> {
    let source = Source::from_arg(cli.input.as_deref());
    let input = match &source {
        Source::Stdin => load_from_reader(stdin),
        Source::Path(_) => load(&source),
    }
    .with_context(|| format!("cannot load bars from {source}"))?;

    let scanner = Scanner::with_registry(&ProviderRegistry::builtin(), &cli.scan_config());
    let report = scanner.scan(&input);

    write_report(&report, stdout).context("cannot write report")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(telemetry::default_filter(cli.verbose));
    run(&cli, io::stdin().lock(), io::stdout().lock())
}
