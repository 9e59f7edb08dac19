//! Line-oriented terminal session over the selection engine
//!
//! Reads commands from any async line source and writes responses to any
//! async sink, so the same loop serves stdin/stdout and tests. Provider
//! completions are applied as they arrive, interleaved with input lines.

use crate::engine::{CompletionDisposition, EngineError, SearchAction, SelectionEngine};
use anyhow::Result;
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  show                      Show the form
  select <level> <value>    Select a value
  clear <level>             Clear a level and everything after it
  create <level> <value>    Propose a new value (asks for confirmation)
  yes | no                  Confirm or cancel the proposed value
  search <level> <term>     List matching options
  pick <level> <term>       Select the exact match, or propose the term
  reset                     Start over
  submit                    Print the completed entry
  help                      Show this text
  quit                      Exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Select { level: String, value: String },
    Clear { level: String },
    Create { level: String, value: String },
    Confirm,
    Cancel,
    Search { level: String, term: String },
    Pick { level: String, term: String },
    Reset,
    Submit,
    Help,
    Quit,
}

/// Split off the first whitespace-delimited word
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

/// Parse one input line
///
/// Values keep their inner spaces: `select brand Acme Corp` selects "Acme Corp".
pub fn parse_command(line: &str) -> Result<Command, String> {
    let (verb, rest) = next_word(line);
    let (level, value) = next_word(rest);

    let need_level = |cmd: &str| {
        if level.is_empty() {
            Err(format!("usage: {} <level>", cmd))
        } else {
            Ok(level.to_string())
        }
    };
    let need_value = |cmd: &str| {
        if level.is_empty() || value.is_empty() {
            Err(format!("usage: {} <level> <value>", cmd))
        } else {
            Ok((level.to_string(), value.to_string()))
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "show" | "" => Ok(Command::Show),
        "select" => need_value("select").map(|(level, value)| Command::Select { level, value }),
        "clear" => need_level("clear").map(|level| Command::Clear { level }),
        // Empty values are accepted here; the engine ignores them
        "create" => need_level("create").map(|level| Command::Create {
            level,
            value: value.to_string(),
        }),
        "yes" | "y" => Ok(Command::Confirm),
        "no" | "n" => Ok(Command::Cancel),
        "search" => need_level("search").map(|level| Command::Search {
            level,
            term: value.to_string(),
        }),
        "pick" => need_value("pick").map(|(level, term)| Command::Pick { level, term }),
        "reset" => Ok(Command::Reset),
        "submit" => Ok(Command::Submit),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

/// Text rendering of every level, its value and its status
pub fn render_form(engine: &SelectionEngine) -> String {
    let mut out = String::new();
    let label_width = engine
        .hierarchy()
        .levels()
        .iter()
        .map(|level| level.label.len())
        .max()
        .unwrap_or(0);

    for (position, level) in engine.hierarchy().levels().iter().enumerate() {
        let value = engine.selection(&level.key).ok().flatten();
        let option_count = engine.options(&level.key).map(<[String]>::len).unwrap_or(0);

        let status = if engine.is_loading(&level.key) {
            "loading...".to_string()
        } else if !engine.is_enabled(&level.key).unwrap_or(false) {
            "disabled".to_string()
        } else {
            format!("{} options", option_count)
        };

        let _ = writeln!(
            out,
            "{:>2}. {:<width$}  {:<24}  [{}] ({})",
            position + 1,
            level.label,
            value.unwrap_or("-"),
            level.key,
            status,
            width = label_width
        );
    }

    let progress = engine.progress();
    let _ = writeln!(
        out,
        "Progress: {}/{} ({}%)",
        progress.selected, progress.total, progress.percent
    );
    out
}

enum Flow {
    Continue,
    Quit,
}

fn label_of<'a>(engine: &'a SelectionEngine, level: &'a str) -> &'a str {
    engine
        .hierarchy()
        .get(level)
        .map(|l| l.label.as_str())
        .unwrap_or(level)
}

fn engine_error(e: &EngineError) -> String {
    format!("error: {}\n", e)
}

/// Execute one command against the engine; returns the text to print
fn execute(engine: &mut SelectionEngine, command: Command) -> (String, Flow) {
    let text = match command {
        Command::Show => render_form(engine),
        Command::Select { level, value } => match engine.select_value(&level, Some(value.clone())) {
            Ok(()) => format!("{} = {}\n", label_of(engine, &level), value),
            Err(e) => engine_error(&e),
        },
        Command::Clear { level } => match engine.select_value(&level, None) {
            Ok(()) => format!("{} cleared\n", label_of(engine, &level)),
            Err(e) => engine_error(&e),
        },
        Command::Create { level, value } => match engine.request_create(&level, &value) {
            Ok(Some(pending)) => format!(
                "Add \"{}\" as a new {}? [yes/no]\n",
                pending.value,
                label_of(engine, &pending.level)
            ),
            Ok(None) => "Nothing to create\n".to_string(),
            Err(e) => engine_error(&e),
        },
        Command::Confirm => match engine.confirm_create() {
            Ok(value) => format!("Created and selected \"{}\"\n", value),
            Err(e) => engine_error(&e),
        },
        Command::Cancel => match engine.cancel_create() {
            Some(pending) => format!("Discarded \"{}\"\n", pending.value),
            None => "Nothing pending\n".to_string(),
        },
        Command::Search { level, term } => match engine.search(&level, &term) {
            Ok(result) => {
                let mut out = String::new();
                if result.matches.is_empty() {
                    out.push_str("No options available\n");
                }
                for option in &result.matches {
                    let _ = writeln!(out, "  {}", option);
                }
                if result.can_create {
                    let _ = writeln!(out, "  + Create \"{}\" (pick {} {})", term.trim(), level, term.trim());
                }
                out
            }
            Err(e) => engine_error(&e),
        },
        Command::Pick { level, term } => match engine.submit_search(&level, &term) {
            Ok(SearchAction::Selected(value)) => format!("{} = {}\n", label_of(engine, &level), value),
            Ok(SearchAction::CreationRequested(pending)) => format!(
                "Add \"{}\" as a new {}? [yes/no]\n",
                pending.value,
                label_of(engine, &pending.level)
            ),
            Ok(SearchAction::Ignored) => "Nothing to pick\n".to_string(),
            Err(e) => engine_error(&e),
        },
        Command::Reset => {
            engine.reset();
            "Form reset\n".to_string()
        }
        Command::Submit => match engine.submission() {
            Some(submission) => match serde_json::to_string_pretty(&submission) {
                Ok(json) => format!("Submission complete:\n{}\n", json),
                Err(e) => format!("error: could not serialize submission: {}\n", e),
            },
            None => {
                let progress = engine.progress();
                format!(
                    "Entry incomplete: {}/{} levels selected\n",
                    progress.selected, progress.total
                )
            }
        },
        Command::Help => HELP.to_string(),
        Command::Quit => return (String::new(), Flow::Quit),
    };
    (text, Flow::Continue)
}

/// Notice printed when a completion is applied
fn completion_notice(
    engine: &SelectionEngine,
    level: &str,
    disposition: CompletionDisposition,
) -> Option<String> {
    let label = label_of(engine, level);
    match disposition {
        CompletionDisposition::Committed => {
            let count = engine.options(level).map(<[String]>::len).unwrap_or(0);
            Some(format!("{}: {} options loaded\n", label, count))
        }
        CompletionDisposition::Degraded => Some(format!(
            "{}: suggestions unavailable, you can still create a value\n",
            label
        )),
        CompletionDisposition::Stale => None,
    }
}

/// Run the session until `quit` or end of input
///
/// Remaining in-flight fetches are applied before returning.
pub async fn run_session<R, W>(engine: &mut SelectionEngine, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output.write_all(HELP.as_bytes()).await?;
    output.flush().await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };

                let (text, flow) = match parse_command(&line) {
                    Ok(command) => execute(engine, command),
                    Err(message) => (format!("{}\n", message), Flow::Continue),
                };
                output.write_all(text.as_bytes()).await?;
                output.flush().await?;

                if let Flow::Quit = flow {
                    break;
                }
            }
            Some(completion) = engine.next_completion() => {
                let level = engine
                    .hierarchy()
                    .at(completion.level_index)
                    .map(|l| l.key.clone())
                    .unwrap_or_default();
                let disposition = engine.apply_completion(completion);
                if let Some(notice) = completion_notice(engine, &level, disposition) {
                    output.write_all(notice.as_bytes()).await?;
                    output.flush().await?;
                }
            }
        }
    }

    engine.settle().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_keeps_spaces() {
        assert_eq!(
            parse_command("select brand Acme  Corp").unwrap(),
            Command::Select {
                level: "brand".to_string(),
                value: "Acme  Corp".to_string()
            }
        );
    }

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!(parse_command("").unwrap(), Command::Show);
        assert_eq!(parse_command("  SHOW ").unwrap(), Command::Show);
        assert_eq!(parse_command("yes").unwrap(), Command::Confirm);
        assert_eq!(parse_command("n").unwrap(), Command::Cancel);
        assert_eq!(parse_command("reset").unwrap(), Command::Reset);
        assert_eq!(parse_command("submit").unwrap(), Command::Submit);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_clear_and_create() {
        assert_eq!(
            parse_command("clear catalog").unwrap(),
            Command::Clear {
                level: "catalog".to_string()
            }
        );
        assert_eq!(
            parse_command("create brand   ").unwrap(),
            Command::Create {
                level: "brand".to_string(),
                value: String::new()
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("select brand").is_err());
        assert!(parse_command("clear").is_err());
        assert!(parse_command("pick model").is_err());
        assert!(parse_command("frobnicate").unwrap_err().contains("unknown command"));
    }
}
