use crate::command::AdtObject;
use crate::error::{Action, ObjectKind, Reason, Result, ShellError};
use crate::registry::Registry;
use crate::status::ElemType;
use log::info;
use std::collections::HashMap;

/// Session-scoped storage for user-named ADT instances and integer variables.
///
/// The two namespaces are disjoint: a name may be used by at most one ADT or
/// variable at a time. The store owns every object it holds; operations only
/// borrow them for the duration of a call.
#[derive(Default)]
pub struct InstanceStore {
    adts: HashMap<String, Box<dyn AdtObject>>,
    vars: HashMap<String, ElemType>,
}

impl InstanceStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is taken in either namespace.
    pub fn contains(&self, name: &str) -> bool {
        self.adts.contains_key(name) || self.vars.contains_key(name)
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            return Err(ShellError::NameConflict(name.to_string()));
        }
        Ok(())
    }

    /// Create an uninitialized instance of `type_name` called `name`.
    pub fn create_adt(&mut self, name: &str, type_name: &str, registry: &Registry) -> Result<()> {
        self.ensure_free(name)?;
        let obj = registry.instantiate(type_name, name)?;
        info!("created {} {}", obj.type_name(), name);
        self.adts.insert(name.to_string(), obj);
        Ok(())
    }

    /// Drop the instance `name` together with any storage it owns.
    pub fn delete_adt(&mut self, name: &str) -> Result<()> {
        match self.adts.remove(name) {
            Some(obj) => {
                info!("deleted {} {}", obj.type_name(), name);
                Ok(())
            }
            None => Err(ShellError::object(
                Action::Delete,
                ObjectKind::Adt,
                name,
                Reason::AdtMissing,
            )),
        }
    }

    /// Borrow the instance `name` without knowing its type.
    pub fn adt(&self, name: &str) -> Result<&dyn AdtObject> {
        self.adts
            .get(name)
            .map(|obj| &**obj)
            .ok_or_else(|| adt_missing(name))
    }

    /// Borrow the instance `name` as a concrete ADT type.
    pub fn get<T: AdtObject>(&self, name: &str) -> Result<&T> {
        self.adt(name)?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| wrong_type(name, type_tag::<T>()))
    }

    /// Mutably borrow the instance `name` as a concrete ADT type.
    pub fn get_mut<T: AdtObject>(&mut self, name: &str) -> Result<&mut T> {
        self.adts
            .get_mut(name)
            .ok_or_else(|| adt_missing(name))?
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| wrong_type(name, type_tag::<T>()))
    }

    /// Create a variable initialised to zero.
    pub fn create_variable(&mut self, name: &str) -> Result<()> {
        self.ensure_free(name)?;
        info!("created variable {}", name);
        self.vars.insert(name.to_string(), 0);
        Ok(())
    }

    /// Remove the variable `name`.
    pub fn delete_variable(&mut self, name: &str) -> Result<()> {
        match self.vars.remove(name) {
            Some(_) => {
                info!("deleted variable {}", name);
                Ok(())
            }
            None => Err(ShellError::object(
                Action::Delete,
                ObjectKind::Variable,
                name,
                Reason::VariableMissing,
            )),
        }
    }

    /// Current value of the variable `name`.
    pub fn variable(&self, name: &str) -> Result<ElemType> {
        self.vars
            .get(name)
            .copied()
            .ok_or_else(|| variable_missing(name))
    }

    /// Mutable access to the variable `name`.
    pub fn variable_mut(&mut self, name: &str) -> Result<&mut ElemType> {
        self.vars.get_mut(name).ok_or_else(|| variable_missing(name))
    }

    /// Overwrite an existing variable. Fails when `name` was never created.
    pub fn set_variable(&mut self, name: &str, value: ElemType) -> Result<()> {
        *self.variable_mut(name)? = value;
        Ok(())
    }

    /// Resolve a value token: an existing variable wins, otherwise the token
    /// must be an integer literal.
    pub fn resolve(&self, token: &str) -> Result<ElemType> {
        if let Some(value) = self.vars.get(token) {
            return Ok(*value);
        }
        token
            .parse::<ElemType>()
            .map_err(|_| ShellError::InvalidArgument(token.to_string()))
    }

    /// `(type tag, name)` pairs in map order.
    pub fn adts(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.adts
            .iter()
            .map(|(name, obj)| (obj.type_name(), name.as_str()))
    }

    /// `(name, value)` pairs in map order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, ElemType)> {
        self.vars.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

fn adt_missing(name: &str) -> ShellError {
    ShellError::object(Action::Search, ObjectKind::Adt, name, Reason::AdtMissing)
}

fn variable_missing(name: &str) -> ShellError {
    ShellError::object(Action::Search, ObjectKind::Variable, name, Reason::VariableMissing)
}

fn wrong_type(name: &str, expected: &'static str) -> ShellError {
    ShellError::object(Action::Search, ObjectKind::Adt, name, Reason::WrongType(expected))
}

/// Short type name of `T` for error messages.
fn type_tag<T: AdtObject>() -> &'static str {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("requested type")
}
