use crate::error::Result;
use crate::status::{self, Status};
use crate::store::InstanceStore;
use std::any::Any;
use std::io::{self, Write};

/// Object-safe trait for every abstract data type the shell can instantiate.
///
/// One value of each implementor is registered as a prototype. `new <type> <name>`
/// asks the prototype for a [`fresh`](AdtObject::fresh) copy, which is always
/// uninitialized regardless of the prototype's own state.
pub trait AdtObject: Any {
    /// Type tag shown by `list adt`, e.g. "SequenceList".
    fn type_name(&self) -> &'static str;

    /// Produce a new, independent, uninitialized instance of the same type.
    fn fresh(&self) -> Box<dyn AdtObject>;

    /// Whether the instance currently owns storage.
    fn is_initialized(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A named instruction that can be invoked as `Name(arg, arg, ...)`.
///
/// Operations are stateless; everything they act on lives in the [`InstanceStore`]
/// and is looked up by name from the string arguments. The interpreter checks
/// [`arity`](Operation::arity) before calling [`execute`](Operation::execute), so
/// implementations can index `args` freely.
pub trait Operation {
    /// Exact number of arguments the operation requires.
    fn arity(&self) -> usize;

    /// Run the operation.
    ///
    /// Domain failures (empty list, index out of range, uninitialized instance)
    /// are returned as a status. Typed errors are reserved for lookups and
    /// argument parsing, plus allocation failure.
    fn execute(
        &self,
        args: &[String],
        store: &mut InstanceStore,
        stdout: &mut dyn Write,
    ) -> Result<Status>;

    /// Print the outcome of a successful [`execute`](Operation::execute).
    fn report(&self, status: Status, stdout: &mut dyn Write) -> io::Result<()> {
        writeln!(stdout, "Status = {}", status::describe(status))
    }
}
