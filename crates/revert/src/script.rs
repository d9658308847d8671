//! Parsing for replay scripts.
//!
//! One command per line. Blank lines and lines starting with `#` are
//! skipped. Arguments are whitespace-separated; the trailing TEXT of
//! `create` and `write` takes the rest of the line verbatim, with `\n`
//! expanded to a newline.

use revert_resources::FileOp;
use thiserror::Error;

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a file operation through the history.
    Execute(FileOp),
    Undo,
    Redo,
    /// Print the store's files.
    List,
    /// Print the undo and redo stacks.
    History,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command {command:?}")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: usage: {usage}")]
    Usage { line: usize, usage: &'static str },
}

/// Parses a whole script into `(line number, command)` pairs.
///
/// # Errors
///
/// Returns the first malformed line.
pub fn parse_script(source: &str) -> Result<Vec<(usize, Command)>, ScriptError> {
    let mut commands = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        if let Some(command) = parse_line(line, raw)? {
            commands.push((line, command));
        }
    }
    Ok(commands)
}

/// Parses one line. Returns `None` for blank lines and comments.
pub fn parse_line(line: usize, raw: &str) -> Result<Option<Command>, ScriptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(trimmed);
    let usage = |usage| ScriptError::Usage { line, usage };

    let command = match word {
        "create" => {
            let (name, text) = split_word(rest);
            if name.is_empty() {
                return Err(usage("create NAME [TEXT]"));
            }
            Command::Execute(FileOp::create(name, unescape(text)))
        }
        "write" => {
            let (name, text) = split_word(rest);
            if name.is_empty() {
                return Err(usage("write NAME TEXT"));
            }
            Command::Execute(FileOp::write(name, unescape(text)))
        }
        "rename" => match rest.split_whitespace().collect::<Vec<_>>()[..] {
            [from, to] => Command::Execute(FileOp::rename(from, to)),
            _ => return Err(usage("rename FROM TO")),
        },
        "delete" => match rest.split_whitespace().collect::<Vec<_>>()[..] {
            [name] => Command::Execute(FileOp::delete(name)),
            _ => return Err(usage("delete NAME")),
        },
        "undo" | "redo" | "list" | "history" if !rest.is_empty() => {
            return Err(ScriptError::Usage {
                line,
                usage: "undo | redo | list | history take no arguments",
            });
        }
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "list" => Command::List,
        "history" => Command::History,
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(Some(command))
}

/// Splits off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_commands() {
        let script = "\
# set up
create a.txt hello world
write a.txt line one\\nline two

rename a.txt b.txt
delete b.txt
undo
redo
list
history
";
        let commands = parse_script(script).unwrap();
        let lines: Vec<usize> = commands.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, [2, 3, 5, 6, 7, 8, 9, 10]);
        assert_eq!(
            commands[0].1,
            Command::Execute(FileOp::create("a.txt", "hello world"))
        );
        assert_eq!(
            commands[1].1,
            Command::Execute(FileOp::write("a.txt", "line one\nline two"))
        );
        assert_eq!(
            commands[2].1,
            Command::Execute(FileOp::rename("a.txt", "b.txt"))
        );
        assert_eq!(commands[3].1, Command::Execute(FileOp::delete("b.txt")));
        assert_eq!(commands[4].1, Command::Undo);
        assert_eq!(commands[7].1, Command::History);
    }

    #[test]
    fn test_create_without_text() {
        assert_eq!(
            parse_line(1, "  create   empty.txt  ").unwrap(),
            Some(Command::Execute(FileOp::create("empty.txt", "")))
        );
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(
            parse_line(4, "rename only-one"),
            Err(ScriptError::Usage {
                line: 4,
                usage: "rename FROM TO"
            })
        );
        assert!(parse_line(1, "create").is_err());
        assert!(parse_line(1, "delete a b").is_err());
        assert!(parse_line(1, "undo 3").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_script("list\nfrobnicate x\n").unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnknownCommand {
                line: 2,
                command: "frobnicate".to_string()
            }
        );
        assert_eq!(err.to_string(), "line 2: unknown command \"frobnicate\"");
    }
}
