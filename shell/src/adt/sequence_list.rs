//! Growable sequence list backed by a contiguous buffer.
//!
//! Positions are 1-based throughout, matching the textbook operations the
//! instructions are named after.

use crate::command::{AdtObject, Operation};
use crate::error::{Result, ShellError};
use crate::registry::Registry;
use crate::status::{self, ERROR, ElemType, OK, Status};
use crate::store::InstanceStore;
use std::any::Any;
use std::collections::TryReserveError;
use std::io::Write;

/// Capacity allocated by `InitSequenceList`.
pub const LIST_INIT_SIZE: usize = 100;
/// Extra capacity added each time a full list grows.
pub const LIST_INCREMENT: usize = 10;

#[derive(Debug)]
struct Storage {
    elem: Vec<ElemType>,
    /// Allocated capacity in elements. `elem.len() <= listsize` always holds.
    listsize: usize,
}

/// A sequence list is either uninitialized or owns a buffer.
#[derive(Debug, Default)]
pub struct SequenceList {
    storage: Option<Storage>,
}

impl SequenceList {
    /// Allocate fresh, empty storage, discarding any previous contents.
    pub fn init(&mut self) -> std::result::Result<(), TryReserveError> {
        let mut elem = Vec::new();
        elem.try_reserve_exact(LIST_INIT_SIZE)?;
        self.storage = Some(Storage {
            elem,
            listsize: LIST_INIT_SIZE,
        });
        Ok(())
    }

    /// Release storage. Returns false when there was nothing to release.
    pub fn destroy(&mut self) -> bool {
        self.storage.take().is_some()
    }

    /// Current contents, `None` when uninitialized.
    pub fn elements(&self) -> Option<&[ElemType]> {
        self.storage.as_ref().map(|s| s.elem.as_slice())
    }

    /// Number of stored elements.
    pub fn len(&self) -> Option<usize> {
        self.elements().map(<[ElemType]>::len)
    }

    /// Allocated capacity in elements.
    pub fn capacity(&self) -> Option<usize> {
        self.storage.as_ref().map(|s| s.listsize)
    }

    /// Element at 1-based position `i`.
    pub fn get(&self, i: ElemType) -> Option<ElemType> {
        let elems = self.elements()?;
        let idx = position_to_index(i, elems.len())?;
        Some(elems[idx])
    }

    /// 1-based position of the first element equal to `value`, or 0.
    pub fn locate(&self, value: ElemType) -> usize {
        self.elements()
            .and_then(|elems| elems.iter().position(|&e| e == value))
            .map_or(0, |idx| idx + 1)
    }

    /// Insert `value` so that it ends up at position `i`, with `1 <= i <= len + 1`.
    ///
    /// Returns `Ok(false)` when the list is uninitialized or `i` is out of range.
    pub fn insert(
        &mut self,
        i: ElemType,
        value: ElemType,
    ) -> std::result::Result<bool, TryReserveError> {
        let Some(storage) = self.storage.as_mut() else {
            return Ok(false);
        };
        let Some(idx) = position_to_index(i, storage.elem.len() + 1) else {
            return Ok(false);
        };
        if storage.elem.len() >= storage.listsize {
            storage.elem.try_reserve_exact(LIST_INCREMENT)?;
            storage.listsize += LIST_INCREMENT;
        }
        storage.elem.insert(idx, value);
        Ok(true)
    }

    /// Append `value` after the last element.
    pub fn push(&mut self, value: ElemType) -> std::result::Result<bool, TryReserveError> {
        match self.len() {
            Some(len) => self.insert(len as ElemType + 1, value),
            None => Ok(false),
        }
    }

    /// Remove and return the element at 1-based position `i`.
    pub fn delete(&mut self, i: ElemType) -> Option<ElemType> {
        let storage = self.storage.as_mut()?;
        let idx = position_to_index(i, storage.elem.len())?;
        Some(storage.elem.remove(idx))
    }
}

/// Converts a 1-based position into an index, rejecting anything outside `1..=upper`.
fn position_to_index(i: ElemType, upper: usize) -> Option<usize> {
    let i = usize::try_from(i).ok()?;
    (1..=upper).contains(&i).then(|| i - 1)
}

impl AdtObject for SequenceList {
    fn type_name(&self) -> &'static str {
        "SequenceList"
    }

    fn fresh(&self) -> Box<dyn AdtObject> {
        Box::new(SequenceList::default())
    }

    fn is_initialized(&self) -> bool {
        self.storage.is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn grow_failed(name: &str) -> impl FnOnce(TryReserveError) -> ShellError + '_ {
    move |_| ShellError::ResourceExhausted(name.to_string())
}

/// Copy of the list's elements, `None` when it is uninitialized.
fn snapshot(store: &InstanceStore, name: &str) -> Result<Option<Vec<ElemType>>> {
    Ok(store
        .get::<SequenceList>(name)?
        .elements()
        .map(<[ElemType]>::to_vec))
}

/// `InitSequenceList(l)` allocates empty storage, replacing any previous contents.
pub struct InitSequenceList;

impl Operation for InitSequenceList {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        store
            .get_mut::<SequenceList>(&args[0])?
            .init()
            .map_err(grow_failed(&args[0]))?;
        Ok(OK)
    }
}

/// `DestroySequenceList(l)` releases the storage; ERROR when there was none.
pub struct DestroySequenceList;

impl Operation for DestroySequenceList {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let released = store.get_mut::<SequenceList>(&args[0])?.destroy();
        Ok(if released { OK } else { ERROR })
    }
}

/// Destroy followed by init; always leaves an empty, initialized list.
pub struct ClearSequenceList;

impl Operation for ClearSequenceList {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let list = store.get_mut::<SequenceList>(&args[0])?;
        list.destroy();
        list.init().map_err(grow_failed(&args[0]))?;
        Ok(OK)
    }
}

/// `IsSequenceListEmpty(l)` reports TRUE for an initialized list with no elements.
pub struct IsSequenceListEmpty;

impl Operation for IsSequenceListEmpty {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        Ok(match store.get::<SequenceList>(&args[0])?.len() {
            Some(len) => status::from_bool(len == 0),
            None => ERROR,
        })
    }
}

/// Returns the length itself; an uninitialized list reports ERROR, which reads
/// the same as an empty one.
pub struct SequenceListLength;

impl Operation for SequenceListLength {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        Ok(store
            .get::<SequenceList>(&args[0])?
            .len()
            .map_or(ERROR, |len| len as Status))
    }
}

/// `GetElemInSequenceList(l, i, x)` copies the element at position `i` into `x`.
pub struct GetElemInSequenceList;

impl Operation for GetElemInSequenceList {
    fn arity(&self) -> usize {
        3
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let list = store.get::<SequenceList>(&args[0])?;
        if !list.is_initialized() {
            return Ok(ERROR);
        }
        let i = store.resolve(&args[1])?;
        store.variable(&args[2])?;
        match list.get(i) {
            Some(value) => {
                store.set_variable(&args[2], value)?;
                Ok(OK)
            }
            None => Ok(ERROR),
        }
    }
}

/// Position of the first element equal to the value, 0 when absent.
pub struct LocateElemInSequenceList;

impl Operation for LocateElemInSequenceList {
    fn arity(&self) -> usize {
        2
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let list = store.get::<SequenceList>(&args[0])?;
        if !list.is_initialized() {
            return Ok(ERROR);
        }
        let value = store.resolve(&args[1])?;
        Ok(list.locate(value) as Status)
    }
}

/// `PriorElemInSequenceList(l, v, x)` stores the element before the first `v` in `x`.
pub struct PriorElemInSequenceList;

impl Operation for PriorElemInSequenceList {
    fn arity(&self) -> usize {
        3
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let list = store.get::<SequenceList>(&args[0])?;
        let Some(elems) = list.elements() else {
            return Ok(ERROR);
        };
        store.variable(&args[2])?;
        let current = store.resolve(&args[1])?;
        let location = list.locate(current);
        if location <= 1 {
            return Ok(ERROR);
        }
        let prior = elems[location - 2];
        store.set_variable(&args[2], prior)?;
        Ok(OK)
    }
}

/// The last element has no successor and reports ERROR rather than reading
/// past the end of the list.
pub struct NextElemInSequenceList;

impl Operation for NextElemInSequenceList {
    fn arity(&self) -> usize {
        3
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let list = store.get::<SequenceList>(&args[0])?;
        let Some(elems) = list.elements() else {
            return Ok(ERROR);
        };
        store.variable(&args[2])?;
        let current = store.resolve(&args[1])?;
        let location = list.locate(current);
        if location == 0 || location == elems.len() {
            return Ok(ERROR);
        }
        let next = elems[location];
        store.set_variable(&args[2], next)?;
        Ok(OK)
    }
}

/// `SequenceListInsert(l, i, v)` inserts `v` at position `i`, growing the list when full.
pub struct SequenceListInsert;

impl Operation for SequenceListInsert {
    fn arity(&self) -> usize {
        3
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        if !store.get::<SequenceList>(&args[0])?.is_initialized() {
            return Ok(ERROR);
        }
        let i = store.resolve(&args[1])?;
        let value = store.resolve(&args[2])?;
        let inserted = store
            .get_mut::<SequenceList>(&args[0])?
            .insert(i, value)
            .map_err(grow_failed(&args[0]))?;
        Ok(status::from_bool(inserted))
    }
}

/// Removes the element at a position and stores it in the output variable.
pub struct SequenceListDelete;

impl Operation for SequenceListDelete {
    fn arity(&self) -> usize {
        3
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        if !store.get::<SequenceList>(&args[0])?.is_initialized() {
            return Ok(ERROR);
        }
        let i = store.resolve(&args[1])?;
        store.variable(&args[2])?;
        let removed = store.get_mut::<SequenceList>(&args[0])?.delete(i);
        match removed {
            Some(removed) => {
                store.set_variable(&args[2], removed)?;
                Ok(OK)
            }
            None => Ok(ERROR),
        }
    }
}

/// Prints the elements on one line, separated by spaces.
pub struct SequenceListTraverse;

impl Operation for SequenceListTraverse {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, stdout: &mut dyn Write) -> Result<Status> {
        let Some(elems) = store.get::<SequenceList>(&args[0])?.elements() else {
            return Ok(ERROR);
        };
        if !elems.is_empty() {
            let line = elems
                .iter()
                .map(ElemType::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(stdout, "{line}")?;
        }
        Ok(OK)
    }
}

/// `UnionSequenceList(a, b)` appends every element of `b` that `a` lacks.
pub struct UnionSequenceList;

impl Operation for UnionSequenceList {
    fn arity(&self) -> usize {
        2
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let target_ready = store.get::<SequenceList>(&args[0])?.is_initialized();
        let Some(source) = snapshot(store, &args[1])? else {
            return Ok(ERROR);
        };
        if !target_ready {
            return Ok(ERROR);
        }
        let target = store.get_mut::<SequenceList>(&args[0])?;
        for value in source {
            if target.locate(value) == 0 {
                target.push(value).map_err(grow_failed(&args[0]))?;
            }
        }
        Ok(OK)
    }
}

/// `MergeSequenceList(a, b, c)` reinitializes `c` with the ordered merge of the
/// non-decreasing lists `a` and `b`.
pub struct MergeSequenceList;

impl Operation for MergeSequenceList {
    fn arity(&self) -> usize {
        3
    }

    fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
        let a = snapshot(store, &args[0])?;
        let b = snapshot(store, &args[1])?;
        let target = store.get_mut::<SequenceList>(&args[2])?;
        let (Some(a), Some(b)) = (a, b) else {
            return Ok(ERROR);
        };

        let mut merged = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if a[i] <= b[j] {
                merged.push(a[i]);
                i += 1;
            } else {
                merged.push(b[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);

        target.init().map_err(grow_failed(&args[2]))?;
        for value in merged {
            target.push(value).map_err(grow_failed(&args[2]))?;
        }
        Ok(OK)
    }
}

/// Register the sequence list type and its operations.
pub fn load(registry: &mut Registry) {
    registry.add_adt_type("SequenceList", SequenceList::default());
    registry.add_instruction("InitSequenceList", InitSequenceList);
    registry.add_instruction("DestroySequenceList", DestroySequenceList);
    registry.add_instruction("ClearSequenceList", ClearSequenceList);
    registry.add_instruction("IsSequenceListEmpty", IsSequenceListEmpty);
    registry.add_instruction("SequenceListLength", SequenceListLength);
    registry.add_instruction("GetElemInSequenceList", GetElemInSequenceList);
    registry.add_instruction("LocateElemInSequenceList", LocateElemInSequenceList);
    registry.add_instruction("PriorElemInSequenceList", PriorElemInSequenceList);
    registry.add_instruction("NextElemInSequenceList", NextElemInSequenceList);
    registry.add_instruction("SequenceListInsert", SequenceListInsert);
    registry.add_instruction("SequenceListDelete", SequenceListDelete);
    registry.add_instruction("SequenceListTraverse", SequenceListTraverse);
    registry.add_instruction("UnionSequenceList", UnionSequenceList);
    registry.add_instruction("MergeSequenceList", MergeSequenceList);
}
