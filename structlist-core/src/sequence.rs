//! The generic list protocol shared by plain and synchronized lists

use crate::constants::DEFAULT_POP_INDEX;
use crate::engine::{DynamicList, SortOptions};
use crate::lifecycle::{Collectable, Visitor};
use crate::slice::SliceSpec;
use crate::value::Value;
use crate::Result;
use alloc::vec::Vec;
use core::ops::ControlFlow;

/// Operations every list field supports, whatever backs it
///
/// Reads and non-mutating derivations have default implementations over
/// [`values`](Sequence::values); derived lists (`slice`, `concat`,
/// `repeat`, `copy`) are always plain [`DynamicList`]s.
pub trait Sequence {
    /// The dynamic elements, in order
    fn values(&self) -> &[Value];

    /// Number of elements
    fn len(&self) -> usize {
        self.values().len()
    }

    /// True if there are no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` (negative counts from the end)
    fn get(&self, index: i64) -> Result<&Value>;

    /// New plain list holding the addressed elements
    fn slice(&self, spec: &SliceSpec) -> Result<DynamicList>;

    /// True if any element equals `value`
    fn contains(&self, value: &Value) -> bool {
        self.values().iter().any(|item| item == value)
    }

    /// Position of the first element equal to `value` within `[start, stop)`
    fn index_of(&self, value: &Value, start: Option<i64>, stop: Option<i64>) -> Result<usize>;

    /// Number of elements equal to `value`
    fn count(&self, value: &Value) -> usize {
        self.values().iter().filter(|item| *item == value).count()
    }

    /// New plain list: these elements followed by `other`
    fn concat(&self, other: &[Value]) -> Result<DynamicList>;

    /// New plain list: these elements tiled `n` times
    fn repeat(&self, n: i64) -> Result<DynamicList>;

    /// Shallow copy as a plain list
    fn copy(&self) -> DynamicList {
        DynamicList::from_vec(self.values().to_vec())
    }

    /// Append one element
    fn append(&mut self, value: Value) -> Result<()>;

    /// Insert before `index`, clamping out-of-range indices
    fn insert(&mut self, index: i64, value: Value) -> Result<()>;

    /// Remove and return the element at `index` (the last one for `None`)
    fn pop(&mut self, index: Option<i64>) -> Result<Value>;

    /// Remove the first element equal to `value`
    fn remove(&mut self, value: &Value) -> Result<()>;

    /// Reverse in place
    fn reverse(&mut self);

    /// Remove every element
    fn clear(&mut self);

    /// Append every item
    fn extend(&mut self, items: Vec<Value>) -> Result<()>;

    /// Stable sort with keyword options
    fn sort(&mut self, options: &SortOptions<'_>) -> Result<()>;

    /// Replace the element at `index`
    fn set_item(&mut self, index: i64, value: Value) -> Result<()>;

    /// Delete the element at `index`
    fn del_item(&mut self, index: i64) -> Result<()>;

    /// Replace the addressed elements with `items`
    fn set_slice(&mut self, spec: &SliceSpec, items: Vec<Value>) -> Result<()>;

    /// Delete the addressed elements
    fn del_slice(&mut self, spec: &SliceSpec) -> Result<()>;

    /// Repeat in place (`n <= 0` clears)
    fn repeat_in_place(&mut self, n: i64) -> Result<()>;

    /// `self += items`
    fn inplace_concat(&mut self, items: Vec<Value>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.extend(items)?;
        Ok(self)
    }

    /// `self *= n`
    fn inplace_repeat(&mut self, n: i64) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.repeat_in_place(n)?;
        Ok(self)
    }
}

impl Sequence for DynamicList {
    fn values(&self) -> &[Value] {
        self.as_slice()
    }

    fn get(&self, index: i64) -> Result<&Value> {
        self.get_item(index)
    }

    fn slice(&self, spec: &SliceSpec) -> Result<DynamicList> {
        self.get_slice(spec)
    }

    fn index_of(&self, value: &Value, start: Option<i64>, stop: Option<i64>) -> Result<usize> {
        self.find(value, start, stop)
    }

    fn concat(&self, other: &[Value]) -> Result<DynamicList> {
        DynamicList::concat(self, other)
    }

    fn repeat(&self, n: i64) -> Result<DynamicList> {
        DynamicList::repeat(self, n)
    }

    fn append(&mut self, value: Value) -> Result<()> {
        self.push(value).map(|_| ())
    }

    fn insert(&mut self, index: i64, value: Value) -> Result<()> {
        self.insert_at(index, value).map(|_| ())
    }

    fn pop(&mut self, index: Option<i64>) -> Result<Value> {
        self.pop_at(index.unwrap_or(DEFAULT_POP_INDEX))
            .map(|(_, value)| value)
    }

    fn remove(&mut self, value: &Value) -> Result<()> {
        self.remove_first(value).map(|_| ())
    }

    fn reverse(&mut self) {
        DynamicList::reverse(self)
    }

    fn clear(&mut self) {
        DynamicList::clear(self)
    }

    fn extend(&mut self, items: Vec<Value>) -> Result<()> {
        self.extend_from(items).map(|_| ())
    }

    fn sort(&mut self, options: &SortOptions<'_>) -> Result<()> {
        self.sort_with(options)
    }

    fn set_item(&mut self, index: i64, value: Value) -> Result<()> {
        self.set_at(index, value).map(|_| ())
    }

    fn del_item(&mut self, index: i64) -> Result<()> {
        self.delete_at(index).map(|_| ())
    }

    fn set_slice(&mut self, spec: &SliceSpec, items: Vec<Value>) -> Result<()> {
        self.assign_slice(spec, items)
    }

    fn del_slice(&mut self, spec: &SliceSpec) -> Result<()> {
        self.delete_slice(spec)
    }

    fn repeat_in_place(&mut self, n: i64) -> Result<()> {
        DynamicList::repeat_in_place(self, n)
    }
}

impl Collectable for DynamicList {
    fn traverse(&self, visitor: &mut dyn Visitor) -> ControlFlow<()> {
        for value in self.as_slice() {
            visitor.visit_value(value)?;
        }
        ControlFlow::Continue(())
    }

    fn clear_refs(&mut self) {
        DynamicList::clear(self);
    }
}
