//! Twin Validator CLI
//!
//! Validates device descriptions and reports on them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use twin_schemas::config::ReportConfig;
use twin_schemas::{analyze, dtmi, find_unused, loader, OutputFormat, StateGraph, TwinConfig, Validator};

#[derive(Parser)]
#[command(name = "twin-validator")]
#[command(about = "Validate and analyze digital-twin device descriptions")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate model files or directories
    Validate {
        /// Files or directories to validate
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print element statistics for a model
    Stats {
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List events and schemas nothing refers to
    Unused {
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check identifiers against the DTMI grammar
    Dtmi {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Export the state machine to GraphViz DOT
    Graph {
        file: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the inputs were read but did not pass
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = TwinConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Validate { paths } => {
            let validator = Validator::from_config(&config.validation);
            let mut all_valid = true;

            for path in paths {
                all_valid &= validate_path(&validator, &config, &path)?;
            }

            println!();
            if all_valid {
                println!("✅ All models are valid");
            } else {
                println!("❌ Validation failed");
            }
            Ok(all_valid)
        }

        Commands::Stats { file, json } => {
            let model = loader::from_file(&file)?;
            let stats = analyze(&model);

            if json {
                print_json(&stats, config.report.output_format)?;
            } else {
                println!("📊 {} ({})\n", model.display_name, model.id);
                println!("  Properties:     {}", stats.properties);
                println!("  Telemetry:      {}", stats.telemetry);
                println!("  Commands:       {}", stats.commands);
                println!("  Events:         {}", stats.events);
                println!("  Relationships:  {}", stats.relationships);
                println!("  States:         {}", stats.states);
                println!("  Transitions:    {}", stats.transitions);
                println!("  Rules:          {}", stats.rules);
                println!("  Goals:          {}", stats.goals);
                println!("  AI models:      {}", stats.ai_models);
                println!("  State machine:  {}", stats.has_state_machine);
                println!("  Physics:        {}", stats.has_physics);
            }
            Ok(true)
        }

        Commands::Unused { file, json } => {
            let model = loader::from_file(&file)?;
            let unused = find_unused(&model);

            if json {
                print_json(&unused, config.report.output_format)?;
            } else if unused.is_empty() {
                println!("✅ No unused elements in {}", model.id);
            } else {
                for event in &unused.unused_events {
                    println!("  ⚠️  unused event: {}", event);
                }
                for schema in &unused.unused_schemas {
                    println!("  ⚠️  unused schema: {}", schema);
                }
            }
            Ok(true)
        }

        Commands::Dtmi { ids } => {
            let mut all_valid = true;
            for id in ids {
                match dtmi::check(&id) {
                    dtmi::DtmiCheck::Valid => println!("  ✅ {}", id),
                    dtmi::DtmiCheck::Invalid(reason) => {
                        println!("  ❌ {} - {}", id, reason);
                        all_valid = false;
                    }
                }
            }
            Ok(all_valid)
        }

        Commands::Graph { file, output } => {
            let model = loader::from_file(&file)?;
            let Some(machine) = &model.state_machine else {
                bail!("{} has no state machine", model.id);
            };

            let dot = StateGraph::from_state_machine(machine).to_dot();
            match output {
                Some(path) => {
                    std::fs::write(&path, &dot)?;
                    println!("✅ Exported DOT to: {:?}", path);
                }
                None => print!("{}", dot),
            }
            Ok(true)
        }
    }
}

fn validate_path(validator: &Validator, config: &TwinConfig, path: &Path) -> anyhow::Result<bool> {
    if path.is_dir() {
        let mut all_valid = true;
        for loaded in loader::load_directory(path, &config.loader)? {
            let shown = path.join(&loaded.path);
            all_valid &= match loaded.outcome {
                Ok(model) => report(validator, &config.report, &shown, model),
                Err(e) => {
                    println!("❌ {} - {}", shown.display(), e);
                    false
                }
            };
        }
        return Ok(all_valid);
    }

    match loader::from_file(path) {
        Ok(model) => Ok(report(validator, &config.report, path, model)),
        Err(e) => {
            println!("❌ {} - {}", path.display(), e);
            Ok(false)
        }
    }
}

fn report(
    validator: &Validator,
    settings: &ReportConfig,
    path: &Path,
    model: twin_schemas::Model,
) -> bool {
    match validator.validate(model) {
        Ok(model) => {
            println!("✅ {} ({})", path.display(), model.id);
            true
        }
        Err(defects) => {
            println!("❌ {} - {} defect(s)", path.display(), defects.len());
            for defect in defects {
                let defect = if settings.show_suggestions {
                    defect
                } else {
                    defect.without_suggestion()
                };
                println!("   └─ [{}] {}", defect.code(), defect);
            }
            false
        }
    }
}

fn print_json<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let json = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Compact => serde_json::to_string(value)?,
    };
    println!("{}", json);
    Ok(())
}
