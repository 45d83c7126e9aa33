//! `lowergi triage` -- interactive encounter wizard on stdin/stdout.
//!
//! The wizard owns rendering and input parsing only. All routing comes
//! from the engine: ask it for the next step, show the prompt, record the
//! answer, repeat until a terminal recommendation.

use std::io::{self, BufRead, Write};

use lowergi_engine::{
    next_step, Answer, AnswerKind, QuestionId, QuestionPrompt, Step, Symptom, SymptomSet,
    TriageState,
};

pub(crate) fn cmd_triage() {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut state = TriageState::new();
    let mut current_pathway = None;

    println!("Lower GI 2WW Triage Pathway");

    loop {
        let step = match next_step(&state) {
            Ok(step) => step,
            // Unreachable for wizard-built states; bail rather than loop.
            Err(e) => {
                eprintln!("error: {}", e);
                return;
            }
        };

        match step {
            Step::Recommendation(rec) => {
                println!();
                for line in &rec.guidance {
                    println!("{}", line);
                }
                println!("=> {}", rec.code);
                return;
            }
            Step::Question(prompt) => {
                if current_pathway != Some(prompt.pathway) {
                    println!();
                    println!("[{}]", prompt.pathway.label());
                    current_pathway = Some(prompt.pathway);
                }

                let Some(answer) = read_answer(&prompt, &mut lines) else {
                    eprintln!("input closed, encounter abandoned");
                    return;
                };

                match state.record(prompt.question, answer) {
                    Ok(()) => {
                        if prompt.question == QuestionId::Symptoms {
                            for note in state.advisory_notes() {
                                println!("{}", note.text());
                            }
                        }
                    }
                    Err(e) => println!("{} -- try again", e),
                }
            }
        }
    }
}

/// Prompt until a line parses as an answer for this question. Returns
/// `None` when stdin is exhausted.
fn read_answer(
    prompt: &QuestionPrompt,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Option<Answer> {
    loop {
        println!("{}", prompt.text);
        match prompt.kind {
            AnswerKind::MultiSelect => {
                for (index, option) in prompt.options.iter().enumerate() {
                    println!("  {:2}. {}", index + 1, option);
                }
                print!("Enter numbers separated by commas (blank for none) > ");
            }
            AnswerKind::YesNo => print!("(y/n) > "),
            AnswerKind::Count if prompt.question == QuestionId::FitValue => {
                print!("(whole number, or 'unknown' if unavailable) > ")
            }
            AnswerKind::Count => print!("(whole number) > "),
        }
        io::stdout().flush().ok();

        let line = lines.next()?.ok()?;
        match parse_answer(prompt, line.trim()) {
            Ok(answer) => return Some(answer),
            Err(message) => println!("{}", message),
        }
    }
}

fn parse_answer(prompt: &QuestionPrompt, input: &str) -> Result<Answer, String> {
    match prompt.kind {
        AnswerKind::YesNo => match input.to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(Answer::Bool(true)),
            "n" | "no" => Ok(Answer::Bool(false)),
            _ => Err("enter y or n".to_string()),
        },
        AnswerKind::Count => {
            if prompt.question == QuestionId::FitValue
                && matches!(
                    input.to_ascii_lowercase().as_str(),
                    "unknown" | "unavailable" | "skip"
                )
            {
                return Ok(Answer::Unavailable);
            }
            input
                .parse::<i64>()
                .map(Answer::Count)
                .map_err(|_| "enter a whole number".to_string())
        }
        AnswerKind::MultiSelect => {
            let mut set = SymptomSet::new();
            if input.is_empty() {
                return Ok(Answer::Symptoms(set));
            }
            for part in input.split(',') {
                let key: usize = part
                    .trim()
                    .parse()
                    .map_err(|_| format!("'{}' is not a selection number", part.trim()))?;
                let symptom = key
                    .checked_sub(1)
                    .and_then(|i| Symptom::ALL.get(i))
                    .ok_or_else(|| format!("{} is not in the catalogue (1-11)", key))?;
                set.insert(*symptom);
            }
            Ok(Answer::Symptoms(set))
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
