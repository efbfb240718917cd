//! Fixed three-element container.

use crate::command::{AdtObject, Operation};
use crate::error::Result;
use crate::registry::Registry;
use crate::status::{self, ERROR, ElemType, OK, Status};
use crate::store::InstanceStore;
use std::any::Any;
use std::io::Write;

/// Three integers, or nothing until `InitTriplet` runs.
#[derive(Debug, Default)]
pub struct Triplet {
    values: Option<[ElemType; 3]>,
}

impl Triplet {
    /// Store the three values, replacing any previous ones.
    pub fn init(&mut self, values: [ElemType; 3]) {
        self.values = Some(values);
    }

    /// The three values, `None` when uninitialized.
    pub fn values(&self) -> Option<&[ElemType; 3]> {
        self.values.as_ref()
    }

    /// Releases the values. Returns false when the triplet was never initialized.
    pub fn destroy(&mut self) -> bool {
        self.values.take().is_some()
    }

    /// Component at 1-based position `i`.
    pub fn get(&self, i: ElemType) -> Option<ElemType> {
        let idx = component_index(i)?;
        self.values().map(|v| v[idx])
    }

    /// Overwrite the component at position `i`. False when out of range or uninitialized.
    pub fn put(&mut self, i: ElemType, value: ElemType) -> bool {
        match (component_index(i), self.values.as_mut()) {
            (Some(idx), Some(values)) => {
                values[idx] = value;
                true
            }
            _ => false,
        }
    }

    /// Whether the values are non-decreasing.
    pub fn is_ascending(&self) -> Option<bool> {
        self.values().map(|[a, b, c]| a <= b && b <= c)
    }

    /// Whether the values are non-increasing.
    pub fn is_descending(&self) -> Option<bool> {
        self.values().map(|[a, b, c]| a >= b && b >= c)
    }

    /// Largest component.
    pub fn max(&self) -> Option<ElemType> {
        self.values().and_then(|v| v.iter().copied().max())
    }

    /// Smallest component.
    pub fn min(&self) -> Option<ElemType> {
        self.values().and_then(|v| v.iter().copied().min())
    }
}

fn component_index(i: ElemType) -> Option<usize> {
    match i {
        1..=3 => Some(i as usize - 1),
        _ => None,
    }
}

impl AdtObject for Triplet {
    fn type_name(&self) -> &'static str {
        "Triplet"
    }

    fn fresh(&self) -> Box<dyn AdtObject> {
        Box::new(Triplet::default())
    }

    fn is_initialized(&self) -> bool {
        self.values.is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// `InitTriplet(t, a, b, c)`
pub struct InitTriplet;

impl Operation for InitTriplet {
    fn arity(&self) -> usize {
        4
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        store.get::<Triplet>(&args[0])?;
        let values = [
            store.resolve(&args[1])?,
            store.resolve(&args[2])?,
            store.resolve(&args[3])?,
        ];
        store.get_mut::<Triplet>(&args[0])?.init(values);
        Ok(OK)
    }
}

/// `DestroyTriplet(t)`; ERROR when the triplet holds no values.
pub struct DestroyTriplet;

impl Operation for DestroyTriplet {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let released = store.get_mut::<Triplet>(&args[0])?.destroy();
        Ok(if released { OK } else { ERROR })
    }
}

/// `GetElemInTriplet(t, i, x)` copies component `i` into `x`.
pub struct GetElemInTriplet;

impl Operation for GetElemInTriplet {
    fn arity(&self) -> usize {
        3
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let triplet = store.get::<Triplet>(&args[0])?;
        if !triplet.is_initialized() {
            return Ok(ERROR);
        }
        let i = store.resolve(&args[1])?;
        store.variable(&args[2])?;
        let Some(value) = triplet.get(i) else {
            return Ok(ERROR);
        };
        store.set_variable(&args[2], value)?;
        Ok(OK)
    }
}

/// `PutElemIntoTriplet(t, i, v)`
pub struct PutElemIntoTriplet;

impl Operation for PutElemIntoTriplet {
    fn arity(&self) -> usize {
        3
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        if !store.get::<Triplet>(&args[0])?.is_initialized() {
            return Ok(ERROR);
        }
        let i = store.resolve(&args[1])?;
        let value = store.resolve(&args[2])?;
        let stored = store.get_mut::<Triplet>(&args[0])?.put(i, value);
        Ok(status::from_bool(stored))
    }
}

/// `IsTripletAscending(t)`
pub struct IsTripletAscending;

impl Operation for IsTripletAscending {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let triplet = store.get::<Triplet>(&args[0])?;
        Ok(triplet.is_ascending().map_or(ERROR, status::from_bool))
    }
}

/// `IsTripletDescending(t)`
pub struct IsTripletDescending;

impl Operation for IsTripletDescending {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let triplet = store.get::<Triplet>(&args[0])?;
        Ok(triplet.is_descending().map_or(ERROR, status::from_bool))
    }
}

/// Writes an extreme of the triplet into the output variable.
fn store_extreme(
    args: &[String],
    store: &mut InstanceStore,
    pick: fn(&Triplet) -> Option<ElemType>,
) -> Result<Status> {
    let Some(value) = pick(store.get::<Triplet>(&args[0])?) else {
        return Ok(ERROR);
    };
    store.set_variable(&args[1], value)?;
    Ok(OK)
}

/// `GetMaxInTriplet(t, x)` stores the largest component in `x`.
pub struct GetMaxInTriplet;

impl Operation for GetMaxInTriplet {
    fn arity(&self) -> usize {
        2
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        store_extreme(args, store, Triplet::max)
    }
}

/// `GetMinInTriplet(t, x)` stores the smallest component in `x`.
pub struct GetMinInTriplet;

impl Operation for GetMinInTriplet {
    fn arity(&self) -> usize {
        2
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        store_extreme(args, store, Triplet::min)
    }
}

/// Register the triplet type and its operations.
pub fn load(registry: &mut Registry) {
    registry.add_adt_type("Triplet", Triplet::default());
    registry.add_instruction("InitTriplet", InitTriplet);
    registry.add_instruction("DestroyTriplet", DestroyTriplet);
    registry.add_instruction("GetElemInTriplet", GetElemInTriplet);
    registry.add_instruction("PutElemIntoTriplet", PutElemIntoTriplet);
    registry.add_instruction("IsTripletAscending", IsTripletAscending);
    registry.add_instruction("IsTripletDescending", IsTripletDescending);
    registry.add_instruction("GetMaxInTriplet", GetMaxInTriplet);
    registry.add_instruction("GetMinInTriplet", GetMinInTriplet);
}
