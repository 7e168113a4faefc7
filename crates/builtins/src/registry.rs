//! The builtin table.
//!
//! The registry is a closed enum plus a constant table: it is built at
//! compile time and never mutated, so it can be consulted from any thread
//! without synchronization.

use std::fmt;

use melon_common::{Value, ValueType};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::normalize;

/// Host action id of the escape hatch. Never sent to the host: the first
/// argument of a `syscall` call replaces it.
pub const SYSCALL_ACTION_ID: &str = "is.melon.syscall";

/// A language-level builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Escape hatch: `syscall(action_id, args...)`.
    Syscall,
    /// Show the space-joined arguments as a result.
    Print,
    /// Prompt for text input.
    Input,
    /// Stop the workflow with an optional message.
    Exit,
    /// Speak the space-joined arguments.
    Tts,
    /// Dictate text.
    Stt,
    /// Show an alert.
    Alert,
    /// Let the user pick from a list.
    Choose,
    /// Show the dictionary definition of one word.
    Define,
    /// Get the name of one emoji.
    EmojiName,
}

/// All builtins, in definition order.
pub const ALL_BUILTINS: [Builtin; 10] = [
    Builtin::Syscall,
    Builtin::Print,
    Builtin::Input,
    Builtin::Exit,
    Builtin::Tts,
    Builtin::Stt,
    Builtin::Alert,
    Builtin::Choose,
    Builtin::Define,
    Builtin::EmojiName,
];

/// Number of arguments a builtin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    /// `None` means unbounded.
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub const fn any() -> Self {
        Self::at_least(0)
    }

    /// Whether `n` arguments are accepted.
    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (min, Some(max)) if min == max => write!(f, "exactly {min}"),
            (min, Some(max)) => write!(f, "{min} to {max}"),
            (0, None) => f.write_str("any number of"),
            (min, None) => write!(f, "at least {min}"),
        }
    }
}

/// A fully resolved host action: what the host is asked to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostAction {
    /// Host action identifier, e.g. `is.workflow.actions.alert`.
    pub name: String,
    /// Final, normalized arguments.
    pub args: Vec<Value>,
}

impl Builtin {
    /// Look up a builtin by its language-level name.
    pub fn from_name(name: &str) -> Option<Builtin> {
        ALL_BUILTINS.iter().copied().find(|b| b.name() == name)
    }

    /// Language-level name, as it appears in a `BuiltinRef`.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Syscall => "syscall",
            Builtin::Print => "print",
            Builtin::Input => "input",
            Builtin::Exit => "exit",
            Builtin::Tts => "tts",
            Builtin::Stt => "stt",
            Builtin::Alert => "alert",
            Builtin::Choose => "choose",
            Builtin::Define => "define",
            Builtin::EmojiName => "emojiName",
        }
    }

    /// Fixed host action identifier.
    pub fn action_id(&self) -> &'static str {
        match self {
            Builtin::Syscall => SYSCALL_ACTION_ID,
            Builtin::Print => "is.workflow.actions.showresult",
            Builtin::Input => "is.workflow.actions.prompt",
            Builtin::Exit => "is.workflow.actions.stop",
            Builtin::Tts => "is.workflow.actions.speaktext",
            Builtin::Stt => "is.workflow.actions.dictatetext",
            Builtin::Alert => "is.workflow.actions.alert",
            Builtin::Choose => "is.workflow.actions.choosefromlist",
            Builtin::Define => "is.workflow.actions.showdefinition",
            Builtin::EmojiName => "is.workflow.actions.getnameofemoji",
        }
    }

    /// Accepted argument counts.
    pub fn arity(&self) -> Arity {
        match self {
            Builtin::Syscall => Arity::at_least(2),
            Builtin::Print | Builtin::Tts => Arity::any(),
            Builtin::Input | Builtin::Exit => Arity::range(0, 1),
            Builtin::Stt => Arity::range(1, 2),
            Builtin::Alert | Builtin::Choose => Arity::range(1, 3),
            Builtin::Define | Builtin::EmojiName => Arity::exactly(1),
        }
    }

    /// Validate `args` and produce the final argument list.
    ///
    /// Pure: depends only on `args`. `line` is the source line used in
    /// errors.
    pub fn normalize(&self, args: &[Value], line: u32) -> Result<Vec<Value>, ValidationError> {
        let arity = self.arity();
        if !arity.accepts(args.len()) {
            return Err(ValidationError::ArgumentCount {
                line,
                builtin: self.name(),
                expected: arity,
                found: args.len(),
            });
        }

        match self {
            Builtin::Syscall => normalize::syscall(args, line),
            Builtin::Print | Builtin::Tts => Ok(normalize::joined(args)),
            Builtin::Input => normalize::input(args, line),
            Builtin::Exit => Ok(normalize::exit(args)),
            Builtin::Stt => normalize::stt(args, line),
            Builtin::Alert => normalize::alert(args, line),
            Builtin::Choose => normalize::choose(args, line),
            Builtin::Define => normalize::define(args, line),
            Builtin::EmojiName => normalize::emoji_name(args, line),
        }
    }

    /// Normalize `args` and build the host action.
    ///
    /// For `syscall` the first normalized argument names the action and the
    /// rest become its arguments; every other builtin uses its fixed id.
    pub fn request(&self, args: &[Value], line: u32) -> Result<HostAction, ValidationError> {
        let mut args = self.normalize(args, line)?;

        if *self != Builtin::Syscall {
            return Ok(HostAction {
                name: self.action_id().to_string(),
                args,
            });
        }

        // normalize() already checked arity and the type of the first arg.
        let name = match args.first() {
            Some(Value::String(name)) => name.clone(),
            other => {
                return Err(ValidationError::InvalidType {
                    line,
                    expected: ValueType::String,
                    found: other.map_or(ValueType::String, Value::value_type),
                    message: "First argument of syscall (syscall id) must be a string".into(),
                })
            }
        };
        args.remove(0);
        Ok(HostAction { name, args })
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_roundtrips() {
        for builtin in ALL_BUILTINS {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::from_name("printf"), None);
        assert_eq!(Builtin::from_name("emojiname"), None);
    }

    #[test]
    fn only_syscall_uses_melon_namespace() {
        for builtin in ALL_BUILTINS {
            let is_syscall = builtin == Builtin::Syscall;
            assert_eq!(builtin.action_id().starts_with("is.melon."), is_syscall);
        }
    }

    #[test]
    fn arity_display() {
        assert_eq!(Arity::exactly(1).to_string(), "exactly 1");
        assert_eq!(Arity::range(1, 3).to_string(), "1 to 3");
        assert_eq!(Arity::at_least(2).to_string(), "at least 2");
        assert_eq!(Arity::any().to_string(), "any number of");
    }

    #[test]
    fn arity_accepts() {
        assert!(Arity::range(1, 3).accepts(1));
        assert!(Arity::range(1, 3).accepts(3));
        assert!(!Arity::range(1, 3).accepts(0));
        assert!(!Arity::range(1, 3).accepts(4));
        assert!(Arity::at_least(2).accepts(100));
    }

    #[test]
    fn arity_checked_before_types() {
        let err = Builtin::Define.normalize(&[], 9).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ArgumentCount {
                line: 9,
                builtin: "define",
                expected: Arity::exactly(1),
                found: 0,
            }
        );
    }
}
