use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pratki_db::{DbError, FailurePolicy, SchemaStatus, COMPLETION_MESSAGE};
use pratki_kernel::settings::{LoadOptions, Settings};
use pratki_kernel::CollectionSchema;

#[derive(Debug, Parser)]
#[command(name = "pratki-cli", version, about = "Provision the Pratki MongoDB schema")]
struct Cli {
    /// Deployment environment (local, staging, production)
    #[arg(long, global = true)]
    env: Option<String>,

    /// Directory holding base.toml and <env>.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// MongoDB connection string, overriding configuration
    #[arg(long, global = true)]
    uri: Option<String>,

    /// Database name, overriding configuration
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ensure all collections and indexes exist
    Init {
        /// Stop at the first failed statement
        #[arg(long)]
        fail_fast: bool,
    },
    /// Compare the live database with the declared schema
    Status,
    /// Print the declared schema without connecting
    Plan {
        #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlanFormat {
    Text,
    Json,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load_with(LoadOptions {
            environment: self.env.clone(),
            config_dir: self.config_dir.clone(),
        })
        .with_context(|| "failed to load Pratki settings")?;

        if let Some(uri) = &self.uri {
            settings.database.uri = uri.clone();
        }
        if let Some(database) = &self.database {
            settings.database.name = database.clone();
        }
        Ok(settings)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = cli.settings()?;
    pratki_telemetry::init(&settings.telemetry).with_context(|| "failed to initialize telemetry")?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "pratki-cli starting");

    match cli.command {
        Command::Plan { format } => {
            let schemas = pratki_app::declared_schemas()?;
            print_plan(&schemas, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Init { fail_fast } => {
            let policy = if fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::from_settings(&settings.schema)
            };
            let runtime = tokio::runtime::Runtime::new()?;
            let report = runtime
                .block_on(pratki_app::bootstrap::run_with_policy(&settings, policy))
                .inspect_err(|err| {
                    if let Some(DbError::Incomplete { failures, .. }) = err.downcast_ref() {
                        for failure in failures {
                            eprintln!("failed: {}", failure);
                        }
                    }
                })?;

            for collection in &report.collections {
                let created = collection
                    .indexes
                    .iter()
                    .filter(|index| index.outcome == pratki_db::Outcome::Created)
                    .count();
                tracing::info!(
                    collection = %collection.name,
                    outcome = outcome_label(collection.outcome),
                    indexes_created = created,
                    indexes_declared = collection.indexes.len(),
                    "collection provisioned"
                );
            }
            println!("{}", COMPLETION_MESSAGE);
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let runtime = tokio::runtime::Runtime::new()?;
            let status = runtime.block_on(pratki_app::bootstrap::status(&settings))?;
            print_status(&status);
            if status.is_satisfied() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn outcome_label(outcome: pratki_db::Outcome) -> &'static str {
    match outcome {
        pratki_db::Outcome::Created => "created",
        pratki_db::Outcome::AlreadyPresent => "already present",
    }
}

fn print_plan(schemas: &[CollectionSchema], format: PlanFormat) -> anyhow::Result<()> {
    match format {
        PlanFormat::Json => {
            println!("{}", serde_json::to_string_pretty(schemas)?);
        }
        PlanFormat::Text => {
            for schema in schemas {
                println!("{}", schema.name);
                for index in &schema.indexes {
                    let unique = if index.unique { " unique" } else { "" };
                    println!("  {}{}", index.name(), unique);
                }
            }
        }
    }
    Ok(())
}

fn print_status(status: &SchemaStatus) {
    for collection in &status.collections {
        if !collection.exists {
            println!("{:<14} missing", collection.name);
            continue;
        }
        println!(
            "{:<14} {} documents, {} of {} indexes present",
            collection.name,
            collection.documents,
            collection.present.len(),
            collection.present.len() + collection.missing.len() + collection.mismatched.len()
        );
        for name in &collection.missing {
            println!("  missing    {}", name);
        }
        for name in &collection.mismatched {
            println!("  mismatched {}", name);
        }
    }
}
