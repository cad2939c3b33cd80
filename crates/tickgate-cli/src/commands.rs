use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use tickgate_core::{BatchReport, Engine, PipelineConfig, RawTick};

use crate::cli::{Cli, Command, ValidateArgs};
use crate::error::CliError;
use crate::output;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Validate(args) => validate(args),
    }
}

fn validate(args: &ValidateArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let engine = Engine::new(config)?;

    let reader = open_input(&args.input)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut report = BatchReport::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawTick =
            serde_json::from_str(&line).map_err(|source| CliError::MalformedRecord {
                line: index + 1,
                source,
            })?;

        let outcome = engine.validate(&raw);
        report.record(outcome.quality);
        writeln!(out, "{}", output::render(&outcome, args.pretty)?)?;
    }

    eprintln!(
        "validated {} record(s): {} verified, {} suspect, {} rejected",
        report.total, report.verified, report.suspect, report.rejected
    );

    if let Some(path) = &args.dead_letters {
        let records = engine.dead_letters().drain();
        fs::write(path, serde_json::to_string_pretty(&records)?)?;
        tracing::info!(count = records.len(), path = %path.display(), "wrote dead letters");
    }

    if args.strict && report.rejected > 0 {
        return Err(CliError::StrictModeViolation {
            rejected: report.rejected,
        });
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, CliError> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let contents = fs::read_to_string(path)?;
    let config: PipelineConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>, CliError> {
    let reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(fs::File::open(input)?)
    };
    Ok(Box::new(BufReader::new(reader)))
}
