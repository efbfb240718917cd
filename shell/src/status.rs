//! Status codes returned by operations.
//!
//! The code space is deliberately small and overlapping: `OK` and `TRUE` share a
//! value, as do `ERROR` and `FALSE`. Operations that report a length or a
//! position return that value directly, so a caller has to know which
//! operation produced a status before interpreting it.

/// Result of executing an operation.
pub type Status = i32;

/// Every element stored in an ADT or a variable is a plain integer.
pub type ElemType = i32;

pub const TRUE: Status = 1;
pub const FALSE: Status = 0;
pub const OK: Status = 1;
pub const ERROR: Status = 0;
pub const INFEASIBLE: Status = -1;
pub const OVERFLOW: Status = -2;

/// Human readable rendering used by the default `Status = ...` report line.
pub fn describe(status: Status) -> String {
    match status {
        OK => "TRUE/OK (value: 1)".to_string(),
        ERROR => "FALSE/ERROR (value: 0)".to_string(),
        INFEASIBLE => "INFEASIBLE (value: -1)".to_string(),
        OVERFLOW => "OVERFLOW (value: -2)".to_string(),
        other => other.to_string(),
    }
}

/// Maps a boolean predicate onto the status space.
pub fn from_bool(value: bool) -> Status {
    if value { TRUE } else { FALSE }
}
