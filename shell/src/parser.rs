//! Turns one input line into an [`Instruction`].
//!
//! Forms are tried in a fixed order and the first match wins:
//! control directive, management directive, variable directive, call.

use crate::error::{Result, ShellError};
use regex::Regex;
use std::sync::LazyLock;

static NEW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^new (\w+) (\w+)$").unwrap());
static DELETE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^delete (adt|var) (\w+)$").unwrap());
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^list (adt|var)$").unwrap());
static ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*=\s*(\w+)$").unwrap());
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\((?:\s*\w+\s*,)*\s*\w+\s*\)$").unwrap());
static CALL_VOID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\w+)\(\)$").unwrap());
static ARG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Session control, selected by a two-character `/x` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// `/q`
    Quit,
    /// `/?`
    Help,
}

/// Which namespace of the instance store a directive addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Adt,
    Var,
}

impl Namespace {
    fn from_keyword(word: &str) -> Self {
        if word == "adt" {
            Namespace::Adt
        } else {
            Namespace::Var
        }
    }
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Control(Control),

    /// `new var <name>`.
    NewVariable { name: String },

    /// `new <type> <name>` for any `<type>` other than `var`.
    NewAdt { type_name: String, name: String },

    /// `delete adt <name>` or `delete var <name>`.
    Delete { namespace: Namespace, name: String },

    /// `list adt` or `list var`.
    List(Namespace),

    /// `<name> = <token>`. The token is resolved against the variables first and
    /// parsed as an integer literal only when no such variable exists.
    Assign { target: String, value: String },

    /// A bare word. It only means something when it names an existing variable,
    /// which the interpreter checks.
    Inspect(String),

    /// `name(arg, ...)` or `name()`.
    Call { name: String, args: Vec<String> },
}

/// Parse a single line. Fails with [`ShellError::InvalidFormat`] when no form matches.
pub fn parse_line(line: &str) -> Result<Instruction> {
    if let Some(control) = parse_control(line) {
        return Ok(Instruction::Control(control));
    }
    if let Some(management) = parse_management(line) {
        return Ok(management);
    }
    if let Some(variable) = parse_variable(line) {
        return Ok(variable);
    }
    parse_call(line)
}

fn parse_control(line: &str) -> Option<Control> {
    let mut chars = line.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('/'), Some('q'), None) => Some(Control::Quit),
        (Some('/'), Some('?'), None) => Some(Control::Help),
        _ => None,
    }
}

fn parse_management(line: &str) -> Option<Instruction> {
    if let Some(caps) = NEW_RE.captures(line) {
        let name = caps[2].to_string();
        return Some(if &caps[1] == "var" {
            Instruction::NewVariable { name }
        } else {
            Instruction::NewAdt {
                type_name: caps[1].to_string(),
                name,
            }
        });
    }
    if let Some(caps) = DELETE_RE.captures(line) {
        return Some(Instruction::Delete {
            namespace: Namespace::from_keyword(&caps[1]),
            name: caps[2].to_string(),
        });
    }
    LIST_RE
        .captures(line)
        .map(|caps| Instruction::List(Namespace::from_keyword(&caps[1])))
}

fn parse_variable(line: &str) -> Option<Instruction> {
    if let Some(caps) = ASSIGN_RE.captures(line) {
        return Some(Instruction::Assign {
            target: caps[1].to_string(),
            value: caps[2].to_string(),
        });
    }
    NAME_RE
        .is_match(line)
        .then(|| Instruction::Inspect(line.to_string()))
}

fn parse_call(line: &str) -> Result<Instruction> {
    if let Some(caps) = CALL_VOID_RE.captures(line) {
        return Ok(Instruction::Call {
            name: caps[1].to_string(),
            args: Vec::new(),
        });
    }
    let caps = CALL_RE.captures(line).ok_or(ShellError::InvalidFormat)?;
    let name = &caps[1];
    let args = ARG_RE
        .find_iter(&line[name.len()..])
        .map(|m| m.as_str().to_string())
        .collect();
    Ok(Instruction::Call {
        name: name.to_string(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[&str]) -> Instruction {
        Instruction::Call {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_call_with_arguments() {
        assert_eq!(parse_line("foo(1, 2, 3)").unwrap(), call("foo", &["1", "2", "3"]));
        assert_eq!(parse_line("foo(a,b)").unwrap(), call("foo", &["a", "b"]));
        assert_eq!(parse_line("foo( x )").unwrap(), call("foo", &["x"]));
    }

    #[test]
    fn test_call_without_arguments() {
        assert_eq!(parse_line("foo()").unwrap(), call("foo", &[]));
    }

    #[test]
    fn test_malformed_calls() {
        for line in ["foo(1,2", "foo(1,)", "foo(,1)", "foo 1 2", "foo(-1)", "(1)", "", "foo( )"] {
            assert!(
                matches!(parse_line(line), Err(ShellError::InvalidFormat)),
                "{line:?} should not parse"
            );
        }
    }

    #[test]
    fn test_control_directives() {
        assert_eq!(parse_line("/q").unwrap(), Instruction::Control(Control::Quit));
        assert_eq!(parse_line("/?").unwrap(), Instruction::Control(Control::Help));
        // Anything else starting with the sigil falls through and fails later.
        assert!(parse_line("/x").is_err());
        assert!(parse_line("/quit").is_err());
    }

    #[test]
    fn test_management_directives() {
        assert_eq!(
            parse_line("new var x").unwrap(),
            Instruction::NewVariable { name: "x".into() }
        );
        assert_eq!(
            parse_line("new SequenceList l").unwrap(),
            Instruction::NewAdt {
                type_name: "SequenceList".into(),
                name: "l".into()
            }
        );
        assert_eq!(
            parse_line("delete adt l").unwrap(),
            Instruction::Delete {
                namespace: Namespace::Adt,
                name: "l".into()
            }
        );
        assert_eq!(
            parse_line("delete var x").unwrap(),
            Instruction::Delete {
                namespace: Namespace::Var,
                name: "x".into()
            }
        );
        assert_eq!(parse_line("list adt").unwrap(), Instruction::List(Namespace::Adt));
        assert_eq!(parse_line("list var").unwrap(), Instruction::List(Namespace::Var));
    }

    #[test]
    fn test_management_matching_is_strict() {
        // Double spaces and unknown namespaces are not management directives.
        assert!(parse_line("new  var x").is_err());
        assert!(parse_line("delete foo x").is_err());
        assert!(parse_line("list all").is_err());
        assert!(parse_line("new var").is_err());
    }

    #[test]
    fn test_variable_directives() {
        assert_eq!(
            parse_line("x = 5").unwrap(),
            Instruction::Assign {
                target: "x".into(),
                value: "5".into()
            }
        );
        assert_eq!(
            parse_line("x=y").unwrap(),
            Instruction::Assign {
                target: "x".into(),
                value: "y".into()
            }
        );
        assert_eq!(parse_line("x").unwrap(), Instruction::Inspect("x".into()));
    }

    #[test]
    fn test_precedence() {
        // `list` alone is a bare word, not a management directive.
        assert_eq!(parse_line("list").unwrap(), Instruction::Inspect("list".into()));
        // `new` with a single word is not management but could be an assignment.
        assert_eq!(
            parse_line("new = 3").unwrap(),
            Instruction::Assign {
                target: "new".into(),
                value: "3".into()
            }
        );
    }
}
