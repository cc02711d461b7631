use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eva_harvest::config::ConfigLoader;
use eva_harvest::domain::ResultType;
use eva_harvest::ena::EnaHttpClient;
use eva_harvest::error::HarvestError;
use eva_harvest::eva::EvaHttpClient;
use eva_harvest::harvest::{HarvestOptions, Harvester};
use eva_harvest::output::{JsonOutput, JsonStyle, LogSink};

#[derive(Parser)]
#[command(name = "eva-harvest")]
#[command(
    about = "Harvest EVA/ENA analysis metadata for tagged studies into specimen or analysis documents"
)]
#[command(version, author)]
struct Cli {
    /// Document shape to build
    #[arg(long, value_enum, default_value_t = ResultType::Specimen, alias = "result_type")]
    result_type: ResultType,

    /// Path to an eva-harvest.json config file
    #[arg(long)]
    config: Option<String>,

    /// Study name prefix to select (overrides the config)
    #[arg(long)]
    tag: Option<String>,

    /// Print the result mapping on a single line
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<HarvestError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &HarvestError) -> u8 {
    match error {
        HarvestError::MissingConfig(_)
        | HarvestError::ConfigRead(_)
        | HarvestError::ConfigParse(_)
        | HarvestError::InvalidStudyTag(_) => 2,
        HarvestError::EvaHttp(_)
        | HarvestError::EvaStatus { .. }
        | HarvestError::EvaShape(_)
        | HarvestError::EnaHttp(_)
        | HarvestError::EnaStatus { .. }
        | HarvestError::EnaParse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref())?.with_study_tag(cli.tag)?;
    let settings = config.http_settings();

    let eva = EvaHttpClient::new(&config.eva_base_url, &settings)?;
    let ena = EnaHttpClient::new(&config.ena_base_url, &settings)?;
    let harvester = Harvester::new(eva, ena);

    let options = HarvestOptions {
        result_type: cli.result_type,
        study_tag: config.study_tag,
        progress_every: config.progress_every,
    };
    tracing::info!("Start importing {} genotype data", options.study_tag);
    let result = harvester.run(&options, &LogSink)?;

    let style = if cli.compact {
        JsonStyle::Compact
    } else {
        JsonStyle::Pretty
    };
    JsonOutput::print_results(&result.mapping, style)
        .map_err(|err| HarvestError::Output(err.to_string()))?;
    Ok(())
}
