//! `lowergi eval` -- print the next step for a saved encounter state.
//!
//! Batch counterpart of the interactive wizard: a host (or a test) saves
//! the accumulated answers as JSON, and this command reports what the
//! engine would do next.

use std::path::Path;
use std::process;

use lowergi_engine::{next_step, Step, TriageState};

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_eval(answers_path: &Path, output: OutputFormat, quiet: bool) {
    let answers_str = match std::fs::read_to_string(answers_path) {
        Ok(s) => s,
        Err(_) => {
            let msg = format!("error: answers file not found: {}", answers_path.display());
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let state: TriageState = match serde_json::from_str(&answers_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error: invalid JSON in {}: {}", answers_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let step = match next_step(&state) {
        Ok(step) => step,
        Err(e) => {
            let msg = format!("error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }

    match output {
        OutputFormat::Text => {
            for note in state.advisory_notes() {
                println!("{}", note.text());
            }
            match step {
                Step::Question(prompt) => {
                    println!("[{}]", prompt.pathway.label());
                    println!("{}", prompt.text);
                    for (index, option) in prompt.options.iter().enumerate() {
                        println!("  {:2}. {}", index + 1, option);
                    }
                }
                Step::Recommendation(rec) => {
                    for line in &rec.guidance {
                        println!("{}", line);
                    }
                    println!("=> {}", rec.code);
                }
            }
        }
        OutputFormat::Json => {
            let notes: Vec<&str> = state.advisory_notes().iter().map(|n| n.text()).collect();
            let out = serde_json::json!({ "notes": notes, "next": step });
            println!(
                "{}",
                serde_json::to_string_pretty(&out)
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
    }
}
