//! Per-builtin argument normalizers.
//!
//! Arity has already been checked by [`Builtin::normalize`](crate::Builtin::normalize)
//! when these run, so indexing within the accepted range is safe.

use melon_common::value::join_str;
use melon_common::{Value, ValueType};

use crate::emoji;
use crate::error::ValidationError;

pub(crate) fn syscall(args: &[Value], line: u32) -> Result<Vec<Value>, ValidationError> {
    expect_string(&args[0], line, "First argument of syscall (syscall id) must be a string")?;
    Ok(args.to_vec())
}

/// `print` and `tts`: everything coerced and joined into one text argument.
pub(crate) fn joined(args: &[Value]) -> Vec<Value> {
    vec![Value::String(join_str(args))]
}

pub(crate) fn input(args: &[Value], line: u32) -> Result<Vec<Value>, ValidationError> {
    if let Some(prompt) = args.first() {
        expect_string(prompt, line, "First argument of input must be a string.")?;
    }
    Ok(args.to_vec())
}

pub(crate) fn exit(args: &[Value]) -> Vec<Value> {
    let message = args.first().map(Value::str).unwrap_or_default();
    vec![Value::String(message)]
}

pub(crate) fn stt(args: &[Value], line: u32) -> Result<Vec<Value>, ValidationError> {
    let on_tap = expect_bool(&args[0], line, "First argument of stt must be a boolean.")?;
    let mode = if on_tap {
        "On Tap"
    } else {
        match args.get(1) {
            Some(short) => {
                if expect_bool(short, line, "Second argument of stt must be a boolean.")? {
                    "After Short Pause"
                } else {
                    "After Pause"
                }
            }
            None => "After Pause",
        }
    };
    Ok(vec![Value::string(mode)])
}

pub(crate) fn alert(args: &[Value], line: u32) -> Result<Vec<Value>, ValidationError> {
    let text = args[0].str();
    let title = args.get(1).map(Value::str).unwrap_or_default();
    let show_cancel = match args.get(2) {
        Some(v) => expect_bool(v, line, "Third argument of alert must be a boolean.")?,
        None => true,
    };
    Ok(vec![
        Value::String(text),
        Value::String(title),
        Value::Boolean(show_cancel),
    ])
}

/// The options become a list of text values, so the host receives a
/// properly tagged sequence rather than a joined string.
pub(crate) fn choose(args: &[Value], line: u32) -> Result<Vec<Value>, ValidationError> {
    let Some(items) = args[0].elements() else {
        return Err(ValidationError::InvalidTypeMultiple {
            line,
            expected: vec![ValueType::List, ValueType::Tuple],
            found: args[0].value_type(),
            message: "First argument of choose must be a list or tuple.".into(),
        });
    };
    let options = items.iter().map(|item| Value::String(item.str())).collect();
    let prompt = args.get(1).map(Value::str).unwrap_or_default();
    let multiple = match args.get(2) {
        Some(v) => expect_bool(v, line, "Third argument of choose must be a boolean.")?,
        None => false,
    };
    Ok(vec![
        Value::List(options),
        Value::String(prompt),
        Value::Boolean(multiple),
    ])
}

pub(crate) fn define(args: &[Value], line: u32) -> Result<Vec<Value>, ValidationError> {
    let word = expect_string(&args[0], line, "First argument of define must be a string.")?.trim();
    let words = word.split_whitespace().count();
    if words != 1 {
        return Err(ValidationError::InvalidFormat {
            line,
            message: format!(
                "First argument of define must be a single word. Expected 1 word but got {words} words"
            ),
        });
    }
    Ok(vec![Value::string(word)])
}

pub(crate) fn emoji_name(args: &[Value], line: u32) -> Result<Vec<Value>, ValidationError> {
    let text = expect_string(&args[0], line, "First argument of emojiName must be a string.")?.trim();
    if text.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            line,
            message: "First argument of emojiName must not contain whitespace".into(),
        });
    }
    let glyphs = emoji::glyphs(text);
    match glyphs.as_slice() {
        [glyph] => Ok(vec![Value::string(*glyph)]),
        _ => Err(ValidationError::InvalidFormat {
            line,
            message: format!(
                "First argument of emojiName must be a single emoji. Expected 1 emoji but got {} emojis",
                glyphs.len()
            ),
        }),
    }
}

fn expect_string<'a>(value: &'a Value, line: u32, message: &str) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or_else(|| ValidationError::InvalidType {
        line,
        expected: ValueType::String,
        found: value.value_type(),
        message: message.to_string(),
    })
}

fn expect_bool(value: &Value, line: u32, message: &str) -> Result<bool, ValidationError> {
    value.as_bool().ok_or_else(|| ValidationError::InvalidType {
        line,
        expected: ValueType::Boolean,
        found: value.value_type(),
        message: message.to_string(),
    })
}
