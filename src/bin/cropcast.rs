//! Command line front end for the crop production estimator.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use cropcast::about::ABOUT_TEXT;
use cropcast::common::config::AppCfg;
use cropcast::common::log;
use cropcast::data::capitalize;
use cropcast::inference::Measurements;
use cropcast::validation::{self, Severity};
use cropcast::{Engine, Outcome, YieldError};

#[derive(Parser, Debug)]
#[command(
    name = "cropcast",
    about = "Estimate crop production in tons from soil and climate conditions"
)]
struct Cli {
    /// Local path of the cached model artefact
    #[arg(long, global = true, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Download location used when the artefact is not cached
    #[arg(long, global = true, value_name = "URL")]
    model_url: Option<String>,

    /// Crop catalogue CSV (needs `Crop` and `Crop_Type` columns)
    #[arg(long, global = true, value_name = "FILE")]
    crops: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate production for one crop
    Predict {
        #[arg(long)]
        crop: String,

        #[command(flatten)]
        measurements: MeasurementArgs,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// List catalogue crops, optionally of one type
    Crops {
        #[arg(long = "type", value_name = "TYPE")]
        crop_type: Option<String>,
    },
    /// List crop types
    Types,
    /// Show range hints and plausibility issues without predicting
    Advise {
        #[command(flatten)]
        measurements: MeasurementArgs,
    },
    /// Show input bounds and recommended ranges
    Fields,
    /// Describe the estimator
    About,
}

#[derive(Args, Debug)]
struct MeasurementArgs {
    /// Nitrogen, kg/ha
    #[arg(long = "n", default_value_t = 70.0)]
    nitrogen: f64,
    /// Phosphorus, kg/ha
    #[arg(long = "p", default_value_t = 40.0)]
    phosphorus: f64,
    /// Potassium, kg/ha
    #[arg(long = "k", default_value_t = 40.0)]
    potassium: f64,
    /// Soil pH
    #[arg(long, default_value_t = 6.5)]
    ph: f64,
    /// Rainfall, mm
    #[arg(long, default_value_t = 700.0)]
    rainfall: f64,
    /// Temperature, °C
    #[arg(long, default_value_t = 26.0, allow_negative_numbers = true)]
    temperature: f64,
    /// Cultivated area, hectares
    #[arg(long, default_value_t = 1000.0)]
    area: f64,
}

impl From<&MeasurementArgs> for Measurements {
    fn from(args: &MeasurementArgs) -> Self {
        Measurements {
            nitrogen: args.nitrogen,
            phosphorus: args.phosphorus,
            potassium: args.potassium,
            ph: args.ph,
            rainfall: args.rainfall,
            temperature: args.temperature,
            area: args.area,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut cfg = AppCfg::load().with_overrides(cli.model.clone(), cli.model_url.clone(), cli.crops.clone());
    if cli.verbose {
        cfg.log_level = "debug".to_string();
    }
    cfg.log_json |= cli.log_json;
    log::init(&cfg);

    match run(cli.command, Engine::new(cfg)) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(code = err.code() as u32, "{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, engine: Engine) -> Result<ExitCode, YieldError> {
    match command {
        Command::Predict {
            crop,
            measurements,
            json,
        } => {
            let measurements = Measurements::from(&measurements);
            let outcome = engine.submit(&crop, &measurements)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
            Ok(match outcome {
                Outcome::Estimated { .. } => ExitCode::SUCCESS,
                Outcome::Rejected { .. } => ExitCode::from(2),
            })
        }
        Command::Crops { crop_type } => {
            engine.warm_up()?;
            let table = engine.crop_table()?;
            let records: Vec<_> = match crop_type.as_deref() {
                Some(t) => table.crops_of_type(t),
                None => table.records().iter().collect(),
            };
            for record in records {
                println!("{}\t{}", record.name, capitalize(&record.crop_type));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Types => {
            engine.warm_up()?;
            for crop_type in engine.crop_table()?.types() {
                println!("{}", capitalize(&crop_type));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Advise { measurements } => {
            let measurements = Measurements::from(&measurements);
            measurements.ensure_finite()?;
            print_advisories(&validation::advisories(&measurements));
            let issues = validation::check_plausibility(&measurements);
            print_issues(&issues);
            Ok(if issues.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Command::Fields => {
            for range in &validation::FIELD_RANGES {
                println!(
                    "{:<16} {:>8} .. {:<10} recommended {} .. {} {}",
                    range.label,
                    range.min,
                    range.max,
                    range.recommended_low,
                    range.recommended_high,
                    range.unit
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::About => {
            print!("{ABOUT_TEXT}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Estimated {
            crop,
            crop_type,
            display,
            prediction,
            advisories,
        } => {
            print_advisories(advisories);
            match crop_type {
                Some(t) => println!("Crop: {crop} ({})", capitalize(t)),
                None => println!("Crop: {crop} (not in catalogue)"),
            }
            if !prediction.crop_known {
                println!("note: crop unknown to the model, estimated without crop information");
            }
            println!("Estimated crop production: {display}");
        }
        Outcome::Rejected { issues, advisories } => {
            print_advisories(advisories);
            print_issues(issues);
        }
    }
}

fn print_advisories(advisories: &[validation::Advisory]) {
    for advisory in advisories {
        let tag = match advisory.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        println!("{tag}: {} ({})", advisory.message, advisory.field.as_str());
    }
}

fn print_issues(issues: &[String]) {
    if issues.is_empty() {
        return;
    }
    println!("Prediction skipped, inputs look implausible:");
    for issue in issues {
        println!("  - {issue}");
    }
}
