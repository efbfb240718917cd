//! Abstract data types bundled with the shell.
//!
//! Each module registers one prototype and the operations that act on it.

pub mod sequence_list;
pub mod triplet;

use crate::registry::Registry;

/// Register every bundled ADT.
pub fn load_all(registry: &mut Registry) {
    sequence_list::load(registry);
    triplet::load(registry);
}
