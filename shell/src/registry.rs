use crate::command::{AdtObject, Operation};
use crate::error::{Action, ObjectKind, Reason, Result, ShellError};
use std::collections::HashMap;

/// Operations and ADT prototypes known to the shell.
///
/// Filled once at startup by the ADT modules and only read afterwards.
/// Registering the same name twice replaces the earlier entry.
#[derive(Default)]
pub struct Registry {
    instructions: HashMap<String, Box<dyn Operation>>,
    types: HashMap<String, Box<dyn AdtObject>>,
}

impl Registry {
    /// An empty registry with no operations or types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation under the name used to call it.
    pub fn add_instruction(&mut self, name: impl Into<String>, op: impl Operation + 'static) {
        self.instructions.insert(name.into(), Box::new(op));
    }

    /// Register the prototype that `new <name> ...` instances are cloned from.
    pub fn add_adt_type(&mut self, name: impl Into<String>, prototype: impl AdtObject) {
        self.types.insert(name.into(), Box::new(prototype));
    }

    /// Look up an instruction by name.
    pub fn instruction(&self, name: &str) -> Result<&dyn Operation> {
        self.instructions
            .get(name)
            .map(|op| &**op)
            .ok_or_else(|| ShellError::InstructionNotFound(name.to_string()))
    }

    /// Clone the prototype registered under `type_name` for a new instance `name`.
    pub fn instantiate(&self, type_name: &str, name: &str) -> Result<Box<dyn AdtObject>> {
        self.types
            .get(type_name)
            .map(|prototype| prototype.fresh())
            .ok_or_else(|| {
                ShellError::object(Action::Create, ObjectKind::Adt, name, Reason::TypeNotSupported)
            })
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adt::triplet::Triplet;
    use crate::status::{OK, Status};
    use crate::store::InstanceStore;
    use std::io::Write;

    struct Nop;

    impl Operation for Nop {
        fn arity(&self) -> usize {
            0
        }

        fn execute(
            &self,
            _args: &[String],
            _store: &mut InstanceStore,
            _stdout: &mut dyn Write,
        ) -> Result<Status> {
            Ok(OK)
        }
    }

    #[test]
    fn test_resolve_registered_instruction() {
        let mut registry = Registry::new();
        registry.add_instruction("Nop", Nop);
        assert_eq!(registry.instruction("Nop").unwrap().arity(), 0);
    }

    #[test]
    fn test_missing_instruction() {
        let registry = Registry::new();
        let err = registry.instruction("Nop").err().unwrap();
        assert!(matches!(err, ShellError::InstructionNotFound(ref n) if n == "Nop"));
    }

    #[test]
    fn test_instantiate_yields_uninitialized_copy() {
        let mut registry = Registry::new();
        registry.add_adt_type("Triplet", Triplet::default());
        let obj = registry.instantiate("Triplet", "t").unwrap();
        assert_eq!(obj.type_name(), "Triplet");
        assert!(!obj.is_initialized());
    }

    #[test]
    fn test_instantiate_unknown_type() {
        let registry = Registry::new();
        let err = registry.instantiate("Heap", "h").err().unwrap();
        assert_eq!(
            err.to_string(),
            "Create ADT \"h\" failed. Reason: Target ADT type not supported."
        );
    }
}
