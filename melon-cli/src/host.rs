//! Console host: performs host actions against a terminal.
//!
//! Text output goes to the writer, answers come from the reader one line at
//! a time. Actions the console cannot perform are echoed as their JSON
//! request and answered with empty text.

use std::io::{self, BufRead, Write};

use melon_common::Value;
use melon_vm::HostAction;
use tracing::debug;

/// What the host wants the interpreter to do after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Resume with this result.
    Resume(Value),
    /// Stop the program.
    Stop,
}

/// Something that can perform host actions.
pub trait Host {
    fn perform(&mut self, action: &HostAction) -> io::Result<Reply>;
}

/// A [`Host`] backed by a line reader and a writer.
pub struct ConsoleHost<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        if !text.is_empty() {
            writeln!(self.output, "{text}")?;
        }
        self.output.flush()
    }

    fn choose(&mut self, args: &[Value]) -> io::Result<Value> {
        let options: Vec<String> = args
            .first()
            .and_then(Value::elements)
            .map(|items| items.iter().map(Value::str).collect())
            .unwrap_or_default();
        let prompt = args.get(1).map(Value::str).unwrap_or_default();
        let multiple = args.get(2).and_then(Value::as_bool).unwrap_or(false);

        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {option}", i + 1)?;
        }
        self.prompt(&prompt)?;
        let answer = self.read_line()?;

        // Numbers pick options by position; anything else is taken verbatim.
        let pick = |token: &str| -> String {
            match token.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => options[n - 1].clone(),
                _ => token.trim().to_string(),
            }
        };
        if multiple {
            Ok(Value::List(
                answer
                    .split(',')
                    .filter(|t| !t.trim().is_empty())
                    .map(|t| Value::String(pick(t)))
                    .collect(),
            ))
        } else {
            Ok(Value::String(pick(&answer)))
        }
    }
}

impl<R: BufRead, W: Write> Host for ConsoleHost<R, W> {
    fn perform(&mut self, action: &HostAction) -> io::Result<Reply> {
        debug!(action = %action.name, args = action.args.len(), "performing");
        let text = |i: usize| action.args.get(i).map(Value::str).unwrap_or_default();

        let result = match action.name.as_str() {
            "is.workflow.actions.showresult" | "is.workflow.actions.speaktext" => {
                writeln!(self.output, "{}", text(0))?;
                Value::string("")
            }
            "is.workflow.actions.prompt" => {
                self.prompt(&text(0))?;
                Value::String(self.read_line()?)
            }
            "is.workflow.actions.alert" => {
                let title = text(1);
                if title.is_empty() {
                    writeln!(self.output, "{}", text(0))?;
                } else {
                    writeln!(self.output, "{title}: {}", text(0))?;
                }
                Value::string("")
            }
            "is.workflow.actions.choosefromlist" => self.choose(&action.args)?,
            "is.workflow.actions.stop" => {
                let message = text(0);
                if !message.is_empty() {
                    writeln!(self.output, "{message}")?;
                }
                return Ok(Reply::Stop);
            }
            _ => {
                let request = serde_json::to_string(action).map_err(io::Error::other)?;
                writeln!(self.output, "{request}")?;
                Value::string("")
            }
        };
        Ok(Reply::Resume(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn action(name: &str, args: Vec<Value>) -> HostAction {
        HostAction {
            name: name.to_string(),
            args,
        }
    }

    fn perform(stdin: &str, action: &HostAction) -> (Reply, String) {
        let mut out = Vec::new();
        let reply = ConsoleHost::new(Cursor::new(stdin.to_string()), &mut out)
            .perform(action)
            .unwrap();
        (reply, String::from_utf8(out).unwrap())
    }

    #[test]
    fn print_writes_text() {
        let (reply, out) = perform(
            "",
            &action("is.workflow.actions.showresult", vec![Value::string("hi there")]),
        );
        assert_eq!(reply, Reply::Resume(Value::string("")));
        assert_eq!(out, "hi there\n");
    }

    #[test]
    fn prompt_reads_a_line() {
        let (reply, out) = perform(
            "Ada\nrest\n",
            &action("is.workflow.actions.prompt", vec![Value::string("Name?")]),
        );
        assert_eq!(reply, Reply::Resume(Value::string("Ada")));
        assert_eq!(out, "Name?\n");
    }

    #[test]
    fn choose_by_number() {
        let args = vec![
            Value::list([Value::string("red"), Value::string("blue")]),
            Value::string("Pick"),
            Value::boolean(false),
        ];
        let (reply, out) = perform("2\n", &action("is.workflow.actions.choosefromlist", args));
        assert_eq!(reply, Reply::Resume(Value::string("blue")));
        assert!(out.starts_with("1. red\n2. blue\nPick\n"));
    }

    #[test]
    fn choose_multiple() {
        let args = vec![
            Value::list([Value::string("a"), Value::string("b"), Value::string("c")]),
            Value::string(""),
            Value::boolean(true),
        ];
        let (reply, _) = perform("1, 3\n", &action("is.workflow.actions.choosefromlist", args));
        assert_eq!(
            reply,
            Reply::Resume(Value::list([Value::string("a"), Value::string("c")]))
        );
    }

    #[test]
    fn stop_prints_message() {
        let (reply, out) = perform("", &action("is.workflow.actions.stop", vec![Value::string("bye")]));
        assert_eq!(reply, Reply::Stop);
        assert_eq!(out, "bye\n");
    }

    #[test]
    fn unknown_action_is_echoed() {
        let (reply, out) = perform(
            "",
            &action("is.workflow.actions.vibrate", vec![Value::number(2.0)]),
        );
        assert_eq!(reply, Reply::Resume(Value::string("")));
        assert!(out.contains("\"name\":\"is.workflow.actions.vibrate\""), "{out}");
    }
}
