//! An interactive shell for experimenting with abstract data types.
//!
//! Users create named instances of registered ADT types, create integer
//! variables, and call named operations on them:
//!
//! ```text
//! >> new SequenceList l
//! >> InitSequenceList(l)
//! Status = TRUE/OK (value: 1)
//! >> new var x
//! >> SequenceListInsert(l, 1, 42)
//! Status = TRUE/OK (value: 1)
//! ```
//!
//! The main entry point is [`Interpreter`], which owns the [`registry::Registry`] of
//! operations and prototypes and the [`store::InstanceStore`] of user objects. New
//! data types plug in by implementing [`command::AdtObject`] and
//! [`command::Operation`] and registering themselves, the way the modules under
//! [`adt`] do.

pub mod adt;
pub mod command;
pub mod config;
pub mod error;
mod interpreter;
pub mod parser;
pub mod registry;
pub mod status;
pub mod store;

pub use config::Config;
pub use error::{Result, ShellError};
pub use interpreter::{Interpreter, Outcome, Shutdown};
