//! Twin Config CLI
//!
//! View and manage validator configuration.

use clap::{Parser, Subcommand};
use twin_schemas::TwinConfig;

#[derive(Parser)]
#[command(name = "twin-config")]
#[command(about = "View and manage twin validator configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path (default: twin.toml)
        #[arg(short, long, default_value = "twin.toml")]
        output: String,
    },

    /// Validate configuration
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = TwinConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Twin Validator Configuration\n");
                println!("Validation:");
                println!("  Expected context: {}", cfg.validation.expected_context);
                println!("  Check emitted events: {}", cfg.validation.check_emitted_events);
                println!("  Suggest names: {}", cfg.validation.suggest_names);

                println!("\nReport:");
                println!("  Format: {:?}", cfg.report.output_format);
                println!("  Show suggestions: {}", cfg.report.show_suggestions);

                println!("\nLoader:");
                println!("  Extension: {}", cfg.loader.extension);
                println!("  Skip:");
                for prefix in &cfg.loader.skip_prefixes {
                    println!("    - {}", prefix);
                }
            }
        }

        Commands::Init { output } => {
            let cfg = TwinConfig::default();
            cfg.save(&output)?;
            println!("✅ Created config file: {}", output);
        }

        Commands::Validate { config } => match TwinConfig::load_from(config.as_deref()) {
            Ok(cfg) => {
                println!("✅ Configuration is valid");
                println!("   Expected context: {}", cfg.validation.expected_context);
                println!("   Output format: {:?}", cfg.report.output_format);
            }
            Err(e) => {
                eprintln!("❌ Configuration error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
