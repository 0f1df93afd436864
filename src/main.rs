use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patientor_core::config::{resolve_diagnoses_file, strict_submission_from_env_value};
use patientor_core::constants::{DIAGNOSES_FILE_ENV, STRICT_SUBMISSION_ENV};
use patientor_core::{
    CoreConfig, DiagnosisCode, DiagnosisRegistry, EntryForm, EntryId, EntryType,
    HealthCheckRating, check_submission,
};

#[derive(Parser)]
#[command(name = "patientor")]
#[command(about = "Build patient record entries from raw form input")]
struct Cli {
    /// Diagnosis reference data (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long, global = true, env = DIAGNOSES_FILE_ENV)]
    diagnoses: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entry types and the fields each one needs
    EntryTypes,
    /// List diagnosis codes offered for selection
    Diagnoses,
    /// List health check ratings in scale order
    Ratings,
    /// Build an entry payload and print it as JSON
    Build(BuildArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Entry type label or discriminant (e.g. "Health Check" or "HealthCheck")
    #[arg(long = "type")]
    entry_type: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Entry date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value = "")]
    specialist: String,
    /// Diagnosis code; repeat for several
    #[arg(long = "diagnosis-code")]
    diagnosis_codes: Vec<String>,
    /// Health check rating text (e.g. "Low Risk")
    #[arg(long)]
    rating: Option<String>,
    #[arg(long)]
    discharge_date: Option<String>,
    #[arg(long)]
    discharge_criteria: Option<String>,
    #[arg(long)]
    employer: Option<String>,
    #[arg(long)]
    sick_leave_start: Option<String>,
    #[arg(long)]
    sick_leave_end: Option<String>,
    /// Run submission checks before printing; `--strict=false` overrides the environment
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = parse_strict_flag
    )]
    strict: Option<bool>,
    /// Attach this id to the payload
    #[arg(long, conflicts_with = "assign_id")]
    id: Option<String>,
    /// Attach a freshly generated id to the payload
    #[arg(long)]
    assign_id: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patientor=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::EntryTypes => {
            for entry_type in EntryType::ALL {
                let fields: Vec<&str> = entry_type
                    .form_fields()
                    .iter()
                    .map(|f| f.label())
                    .collect();
                println!("{}: {}", entry_type.label(), fields.join(", "));
            }
        }
        Commands::Ratings => {
            for rating in HealthCheckRating::ALL {
                println!("{rating}");
            }
        }
        Commands::Diagnoses => {
            let cfg = CoreConfig::new(resolve_diagnoses_file(cli.diagnoses)?)?;
            let registry = DiagnosisRegistry::load(cfg.diagnoses_file())?;
            for diagnosis in registry.iter() {
                match &diagnosis.latin {
                    Some(latin) => println!("{}\t{} ({latin})", diagnosis.code, diagnosis.name),
                    None => println!("{}\t{}", diagnosis.code, diagnosis.name),
                }
            }
        }
        Commands::Build(args) => {
            let strict = strict_mode(args.strict, std::env::var(STRICT_SUBMISSION_ENV).ok())?;
            let form = fill_form(&args)?;

            let values = match form.build_tagged(&args.entry_type) {
                Ok(values) => values,
                Err(e) => anyhow::bail!("cannot build entry: {e}"),
            };

            if strict {
                let cfg = CoreConfig::new(resolve_diagnoses_file(cli.diagnoses)?)?;
                let registry = DiagnosisRegistry::load(cfg.diagnoses_file())?;
                check_submission(&values, &registry)?;
            }

            let id = match (args.id, args.assign_id) {
                (Some(id), _) => Some(EntryId::new(id)?),
                (None, true) => Some(EntryId::new(uuid::Uuid::new_v4().to_string())?),
                (None, false) => None,
            };

            let json = match id {
                Some(id) => serde_json::to_string_pretty(&values.into_entry(id))?,
                None => values.to_json_pretty()?,
            };
            println!("{json}");
        }
    }

    Ok(())
}

fn parse_strict_flag(raw: &str) -> patientor_core::EntryResult<bool> {
    strict_submission_from_env_value(Some(raw.to_owned()))
}

/// An explicit `--strict` value wins over the environment.
fn strict_mode(flag: Option<bool>, env_value: Option<String>) -> anyhow::Result<bool> {
    match flag {
        Some(strict) => Ok(strict),
        None => Ok(strict_submission_from_env_value(env_value)?),
    }
}

/// Replay the command-line fields into a form the way a UI would fire edit events.
fn fill_form(args: &BuildArgs) -> anyhow::Result<EntryForm> {
    let mut form = EntryForm::new();
    form.set_description(args.description.as_str());
    form.set_date(args.date.as_str());
    form.set_specialist(args.specialist.as_str());

    for raw in &args.diagnosis_codes {
        form.add_diagnosis_code(DiagnosisCode::new(raw)?);
    }

    if let Some(raw) = &args.rating {
        form.select_health_check_rating(raw);
        if HealthCheckRating::resolve(raw).is_none() {
            tracing::warn!(
                "unrecognised rating {raw:?}, keeping {}",
                form.health_check_rating()
            );
        }
    }
    if let Some(date) = &args.discharge_date {
        form.set_discharge_date(date);
    }
    if let Some(criteria) = &args.discharge_criteria {
        form.set_discharge_criteria(criteria);
    }
    if let Some(employer) = &args.employer {
        form.set_employer_name(employer.as_str());
    }
    if let Some(start) = &args.sick_leave_start {
        form.set_sick_leave_start_date(start);
    }
    if let Some(end) = &args.sick_leave_end {
        form.set_sick_leave_end_date(end);
    }

    Ok(form)
}
