//! Construction policy for list fields
//!
//! A list built outside a record has no declared element type and no owner,
//! so it cannot have a typed mirror. It is simply a [`DynamicList`]. Only a
//! record binds a [`StructList`], supplying both.

use crate::convert::ElementStorage;
use crate::engine::DynamicList;
use crate::lifecycle::{HostRecord, OwnerRef};
use crate::struct_list::StructList;
use crate::types::FieldType;
use crate::value::Value;
use crate::Result;
use alloc::rc::Weak;
use alloc::vec::Vec;

/// A list constructed directly, with no backing store and no type checks
pub fn standalone(items: impl IntoIterator<Item = Value>) -> DynamicList {
    items.into_iter().collect()
}

/// A record field of `field_type`, linked to `owner` and seeded with `items`
///
/// Fails if `S` cannot back `field_type` or if any item does not convert;
/// nothing is built in either case.
pub fn bound<S: ElementStorage>(
    field_type: FieldType,
    owner: Weak<dyn HostRecord>,
    items: Vec<Value>,
) -> Result<StructList<S>> {
    StructList::with_values(field_type, OwnerRef::new(owner), items)
}
