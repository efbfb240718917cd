//! Failures raised while parsing or dispatching an instruction.

use std::fmt;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ShellError>;

/// What the interpreter was trying to do with a named object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Delete,
    Search,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "Create",
            Action::Delete => "Delete",
            Action::Search => "Search",
        })
    }
}

/// The two namespaces of the instance store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Adt,
    Variable,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectKind::Adt => "ADT",
            ObjectKind::Variable => "Variable",
        })
    }
}

/// Why an object operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    TypeNotSupported,
    AdtMissing,
    VariableMissing,
    WrongType(&'static str),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::TypeNotSupported => f.write_str("Target ADT type not supported."),
            Reason::AdtMissing => f.write_str("Target ADT not exists."),
            Reason::VariableMissing => f.write_str("Target variable not exists."),
            Reason::WrongType(expected) => write!(f, "Target ADT is not a {expected}."),
        }
    }
}

/// Every typed failure the interpreter can surface.
///
/// All variants except [`ShellError::ResourceExhausted`] and [`ShellError::Io`] are
/// recoverable: the session prints the message and reads the next line.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The line matched none of the recognised forms.
    #[error("Invalid instruction format. Examples: InitTriplet(t, 1, 2, 3), SequenceListLength(l).")]
    InvalidFormat,

    #[error("Instruction \"{0}\" not found.")]
    InstructionNotFound(String),

    /// A named ADT or variable could not be created, deleted or looked up.
    #[error("{action} {kind} \"{name}\" failed. Reason: {reason}")]
    ObjectFailed {
        action: Action,
        kind: ObjectKind,
        name: String,
        reason: Reason,
    },

    #[error("ADT/Variable with name \"{0}\" already exists.")]
    NameConflict(String),

    #[error("Invalid argument count: {needed} is needed, but {given} is given.")]
    ArgumentCount { needed: usize, given: usize },

    /// A token was neither a known variable nor an integer literal.
    #[error("Invalid argument: \"{0}\".")]
    InvalidArgument(String),

    /// Storage for the named instance could not be allocated.
    #[error("Out of memory while allocating storage for \"{0}\".")]
    ResourceExhausted(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShellError {
    pub(crate) fn object(action: Action, kind: ObjectKind, name: &str, reason: Reason) -> Self {
        ShellError::ObjectFailed {
            action,
            kind,
            name: name.to_string(),
            reason,
        }
    }

    /// True when the session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::ResourceExhausted(_) | ShellError::Io(_))
    }
}
