mod batch;
mod serve;
mod wizard;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use lowergi_engine::Symptom;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Lower GI 2WW triage pathway toolchain.
#[derive(Parser)]
#[command(name = "lowergi", version, about = "Lower GI 2WW triage pathway toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a triage encounter interactively on the terminal
    Triage,

    /// Print the next step for a saved encounter state
    Eval {
        /// Path to the encounter state JSON file
        #[arg(long)]
        answers: PathBuf,
    },

    /// Print the symptom catalogue with selection keys
    Symptoms,

    /// Start the HTTP JSON API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

/// Report an error in the requested output format.
pub(crate) fn report_error(message: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", message),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": message })),
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Triage => wizard::cmd_triage(),
        Commands::Eval { answers } => batch::cmd_eval(&answers, cli.output, cli.quiet),
        Commands::Symptoms => cmd_symptoms(cli.output),
        Commands::Serve { port } => {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("error: failed to start async runtime: {}", e);
                    process::exit(1);
                }
            };
            if let Err(e) = runtime.block_on(serve::start_server(port)) {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        }
    }
}

fn cmd_symptoms(output: OutputFormat) {
    match output {
        OutputFormat::Text => {
            for (index, symptom) in Symptom::ALL.iter().enumerate() {
                println!("{:2}. {}", index + 1, symptom.label());
            }
        }
        OutputFormat::Json => {
            let symptoms: Vec<serde_json::Value> = Symptom::ALL
                .iter()
                .enumerate()
                .map(|(index, symptom)| {
                    serde_json::json!({
                        "key": index + 1,
                        "id": symptom,
                        "label": symptom.label(),
                        "fit_not_required": symptom.fit_not_required(),
                    })
                })
                .collect();
            let out = serde_json::json!({ "symptoms": symptoms });
            println!(
                "{}",
                serde_json::to_string_pretty(&out)
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
    }
}
