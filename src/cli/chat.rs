//! Interactive chat command

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;

use super::{print_download_hints, stream_response};
use crate::config::GenerationConfig;
use crate::engine::Executor;
use crate::scan::{self, ModelEntry};

/// Run the interactive chat loop.
pub async fn chat(
    model: Option<PathBuf>,
    tokenizer: Option<String>,
    temp: f32,
    max_tokens: usize,
    seed: u64,
) -> Result<()> {
    let model_path = match model {
        Some(path) if path.is_file() => {
            println!(
                "Using model: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );
            path
        }
        other => {
            if let Some(missing) = other {
                eprintln!("Model not found: {}", missing.display());
            }
            println!("Searching for local models...\n");
            let models = scan::find_gguf_models();
            match select_model(&models)? {
                Some(entry) => {
                    println!("Selected: {}", entry.name);
                    entry.path.clone()
                }
                None => return Ok(()),
            }
        }
    };

    println!("\nLoading model...");
    let mut executor = match Executor::load(&model_path, tokenizer.as_deref(), None) {
        Ok(executor) => executor,
        Err(e) => {
            eprintln!("Failed to load model: {}", e);
            return Ok(());
        }
    };

    let config = GenerationConfig {
        max_tokens,
        temperature: temp,
        seed,
        ..Default::default()
    };

    println!("\nChat started. Type your prompt and press Enter; 'quit' to leave.");
    println!("Temperature: {}, max tokens: {}\n", temp, max_tokens);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if matches!(input, "quit" | "exit" | "q") {
            break;
        }

        let stats = stream_response(&mut executor, input, &config).await?;
        if stats.generated > 0 {
            println!("({:.1} tok/s)\n", stats.gen_tps());
        } else {
            println!();
        }
    }

    Ok(())
}

/// Outcome of parsing one line of selection input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Selection {
    /// A valid index into the model list (zero-based)
    Pick(usize),
    /// The user asked to leave
    Quit,
    /// Out of range or not a number; re-prompt
    Invalid,
}

pub(crate) fn parse_selection(input: &str, count: usize) -> Selection {
    let input = input.trim();

    if ["q", "quit", "exit"]
        .iter()
        .any(|word| input.eq_ignore_ascii_case(word))
    {
        return Selection::Quit;
    }

    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Selection::Pick(n - 1),
        _ => Selection::Invalid,
    }
}

/// Print the discovered models and prompt for a numeric choice.
///
/// Returns `None` when nothing is available or the user quits.
fn select_model(models: &[ModelEntry]) -> Result<Option<&ModelEntry>> {
    if models.is_empty() {
        println!("No GGUF models found locally.");
        print_download_hints();
        return Ok(None);
    }

    println!("{} model(s) available:\n", models.len());
    for (i, model) in models.iter().enumerate() {
        println!("{:2}. {}", i + 1, model.name);
        println!(
            "    {} ({}) - {}\n",
            model.filename,
            model.display_size(),
            model.source
        );
    }

    loop {
        print!("Select a model (number): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match parse_selection(&line, models.len()) {
            Selection::Pick(index) => return Ok(Some(&models[index])),
            Selection::Quit => return Ok(None),
            Selection::Invalid => {
                println!("Enter a number between 1 and {}", models.len());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_in_range_select_a_model() {
        assert_eq!(parse_selection("1", 3), Selection::Pick(0));
        assert_eq!(parse_selection("3", 3), Selection::Pick(2));
        assert_eq!(parse_selection("  2 \n", 3), Selection::Pick(1));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert_eq!(parse_selection("0", 3), Selection::Invalid);
        assert_eq!(parse_selection("4", 3), Selection::Invalid);
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        assert_eq!(parse_selection("abc", 3), Selection::Invalid);
        assert_eq!(parse_selection("", 3), Selection::Invalid);
        assert_eq!(parse_selection("1.5", 3), Selection::Invalid);
    }

    #[test]
    fn quit_words_abort_selection() {
        assert_eq!(parse_selection("q", 3), Selection::Quit);
        assert_eq!(parse_selection("quit", 3), Selection::Quit);
        assert_eq!(parse_selection("EXIT", 3), Selection::Quit);
    }
}
