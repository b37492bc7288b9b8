//! The dynamic list engine behind every front view
//!
//! `DynamicList` implements the generic ordered-sequence semantics: negative
//! indices, insert clamping, extended slices, stable sort with a key and a
//! reverse flag, repetition. Every mutating entry point validates before it
//! touches storage, and reports the resolved position it acted on so that a
//! mirror can replay the same change without resolving the index again.

use crate::constants::check_len;
use crate::error::ListError;
use crate::slice::SliceSpec;
use crate::value::Value;
use crate::Result;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::mem;
use core::ops::Index;

/// Key function applied to each element before comparison
pub type KeyFn<'a> = &'a dyn Fn(&Value) -> Result<Value>;

/// Keyword options accepted by sort
#[derive(Clone, Copy, Default)]
pub struct SortOptions<'a> {
    /// Optional key extractor
    pub key: Option<KeyFn<'a>>,

    /// Sort descending while keeping equal elements in their original order
    pub reverse: bool,
}

impl<'a> SortOptions<'a> {
    /// Ascending sort on the elements themselves
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reverse flag
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Compare by `key(element)` instead of the element
    pub fn key(mut self, key: KeyFn<'a>) -> Self {
        self.key = Some(key);
        self
    }
}

impl core::fmt::Debug for SortOptions<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SortOptions")
            .field("key", &self.key.map(|_| "<fn>"))
            .field("reverse", &self.reverse)
            .finish()
    }
}

/// An ordered sequence of arbitrary values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicList {
    items: Vec<Value>,
}

impl DynamicList {
    /// Create an empty list
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Take ownership of existing items
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the list holds no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow the elements
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Consume the list, returning its elements
    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    /// Resolve an index that must address an existing element
    pub fn resolve_index(&self, index: i64, context: &'static str) -> Result<usize> {
        let len = self.items.len();
        let resolved = if index < 0 {
            index.checked_add(len as i64)
        } else {
            Some(index)
        };
        match resolved {
            Some(i) if i >= 0 && (i as usize) < len => Ok(i as usize),
            _ => Err(ListError::IndexOutOfRange {
                context,
                index,
                len,
            }),
        }
    }

    /// Resolve an insertion point, clamping to `[0, len]`
    pub fn clamp_insert_index(&self, index: i64) -> usize {
        let len = self.items.len() as i64;
        let mut at = index;
        if at < 0 {
            at = at.saturating_add(len);
            if at < 0 {
                at = 0;
            }
        }
        at.min(len) as usize
    }

    /// Element at `index` (negative counts from the end)
    pub fn get_item(&self, index: i64) -> Result<&Value> {
        let at = self.resolve_index(index, "list")?;
        Ok(&self.items[at])
    }

    /// New list holding the elements addressed by `spec`
    pub fn get_slice(&self, spec: &SliceSpec) -> Result<DynamicList> {
        let resolved = spec.resolve(self.items.len())?;
        Ok(DynamicList::from_vec(
            resolved.indices().map(|i| self.items[i].clone()).collect(),
        ))
    }

    /// Position of the first element equal to `value` within `[start, stop)`
    pub fn find(&self, value: &Value, start: Option<i64>, stop: Option<i64>) -> Result<usize> {
        let resolved = SliceSpec::new(start, stop, None).resolve(self.items.len())?;
        let (lo, hi) = (resolved.start as usize, resolved.stop.max(resolved.start) as usize);
        self.items[lo..hi]
            .iter()
            .position(|item| item == value)
            .map(|offset| lo + offset)
            .ok_or(ListError::NotFound("list.index(x)"))
    }

    /// Number of elements equal to `value`
    pub fn count_of(&self, value: &Value) -> usize {
        self.items.iter().filter(|item| *item == value).count()
    }

    /// Append one element
    pub fn push(&mut self, value: Value) -> Result<usize> {
        check_len(self.items.len().checked_add(1))?;
        self.items.push(value);
        Ok(self.items.len() - 1)
    }

    /// Insert before `index`, clamping out-of-range indices; returns the position used
    pub fn insert_at(&mut self, index: i64, value: Value) -> Result<usize> {
        check_len(self.items.len().checked_add(1))?;
        let at = self.clamp_insert_index(index);
        self.items.insert(at, value);
        Ok(at)
    }

    /// Remove and return the element at `index`, with the position used
    pub fn pop_at(&mut self, index: i64) -> Result<(usize, Value)> {
        if self.items.is_empty() {
            return Err(ListError::PopFromEmpty);
        }
        let at = self.resolve_index(index, "pop")?;
        Ok((at, self.items.remove(at)))
    }

    /// Replace the element at `index`, returning the position and the previous value
    pub fn set_at(&mut self, index: i64, value: Value) -> Result<(usize, Value)> {
        let at = self.resolve_index(index, "list assignment")?;
        Ok((at, mem::replace(&mut self.items[at], value)))
    }

    /// Delete the element at `index`, returning the position and the removed value
    pub fn delete_at(&mut self, index: i64) -> Result<(usize, Value)> {
        let at = self.resolve_index(index, "list assignment")?;
        Ok((at, self.items.remove(at)))
    }

    /// Remove the first element equal to `value`, returning its position and the element
    pub fn remove_first(&mut self, value: &Value) -> Result<(usize, Value)> {
        let at = self
            .items
            .iter()
            .position(|item| item == value)
            .ok_or(ListError::NotFound("list.remove(x)"))?;
        Ok((at, self.items.remove(at)))
    }

    /// Remove the element at an already resolved position
    pub(crate) fn take_at(&mut self, at: usize) -> Value {
        self.items.remove(at)
    }

    /// Overwrite an already resolved position, returning the old element
    pub(crate) fn replace_at(&mut self, at: usize, value: Value) -> Value {
        mem::replace(&mut self.items[at], value)
    }

    /// Reverse in place
    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Shrink to `len` elements (no-op if already shorter)
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Append every item; returns the previous length
    pub fn extend_from(&mut self, items: Vec<Value>) -> Result<usize> {
        let old_len = self.items.len();
        check_len(old_len.checked_add(items.len()))?;
        self.items.extend(items);
        Ok(old_len)
    }

    /// Stable sort honoring the key and reverse options
    ///
    /// The new order is computed on a permutation first, so an incomparable
    /// pair or a failing key leaves the list exactly as it was.
    pub fn sort_with(&mut self, options: &SortOptions<'_>) -> Result<()> {
        let computed;
        let keys: &[Value] = match options.key {
            Some(key) => {
                computed = self.items.iter().map(key).collect::<Result<Vec<_>>>()?;
                &computed
            }
            None => &self.items,
        };

        let mut order: Vec<usize> = (0..keys.len()).collect();
        let mut failure = None;

        // Reverse, stable sort, reverse again keeps ties in original order
        if options.reverse {
            order.reverse();
        }
        order.sort_by(|&a, &b| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            keys[a].try_cmp(&keys[b]).unwrap_or_else(|err| {
                failure = Some(err);
                Ordering::Equal
            })
        });
        if options.reverse {
            order.reverse();
        }

        if let Some(err) = failure {
            return Err(err);
        }

        let mut slots: Vec<Option<Value>> = mem::take(&mut self.items).into_iter().map(Some).collect();
        self.items = order.iter().filter_map(|&i| slots[i].take()).collect();
        Ok(())
    }

    /// Replace the elements addressed by `spec` with `items`
    ///
    /// A contiguous slice may change the length; an extended slice requires
    /// exactly one item per addressed position.
    pub fn assign_slice(&mut self, spec: &SliceSpec, items: Vec<Value>) -> Result<()> {
        let resolved = spec.resolve(self.items.len())?;

        if resolved.is_simple() {
            let lo = resolved.start as usize;
            let hi = resolved.stop.max(resolved.start) as usize;
            let new_len = (self.items.len() - (hi - lo)).checked_add(items.len());
            check_len(new_len)?;
            self.items.splice(lo..hi, items);
            return Ok(());
        }

        if items.len() != resolved.len {
            return Err(ListError::SliceSizeMismatch {
                expected: resolved.len,
                actual: items.len(),
            });
        }
        for (at, item) in resolved.indices().zip(items) {
            self.items[at] = item;
        }
        Ok(())
    }

    /// Delete the elements addressed by `spec`
    pub fn delete_slice(&mut self, spec: &SliceSpec) -> Result<()> {
        let resolved = spec.resolve(self.items.len())?;
        if resolved.len == 0 {
            return Ok(());
        }

        if resolved.is_simple() {
            self.items.drain(resolved.start as usize..resolved.stop as usize);
            return Ok(());
        }

        let mut doomed = alloc::vec![false; self.items.len()];
        for at in resolved.indices() {
            doomed[at] = true;
        }
        let mut position = 0;
        self.items.retain(|_| {
            let keep = !doomed[position];
            position += 1;
            keep
        });
        Ok(())
    }

    /// New list with `other` appended
    pub fn concat(&self, other: &[Value]) -> Result<DynamicList> {
        check_len(self.items.len().checked_add(other.len()))?;
        let mut items = Vec::with_capacity(self.items.len() + other.len());
        items.extend_from_slice(&self.items);
        items.extend_from_slice(other);
        Ok(DynamicList::from_vec(items))
    }

    /// New list holding `n` copies of the elements (`n <= 0` is empty)
    pub fn repeat(&self, n: i64) -> Result<DynamicList> {
        let mut copy = self.clone();
        copy.repeat_in_place(n)?;
        Ok(copy)
    }

    /// Tile the elements `n` times in place (`n <= 0` clears)
    pub fn repeat_in_place(&mut self, n: i64) -> Result<()> {
        if n <= 0 || self.items.is_empty() {
            self.items.clear();
            return Ok(());
        }
        let times = usize::try_from(n).ok();
        let new_len = times.and_then(|t| self.items.len().checked_mul(t));
        let new_len = check_len(new_len)?;

        let old_len = self.items.len();
        self.items.reserve(new_len - old_len);
        for _ in 1..n {
            self.items.extend_from_within(..old_len);
        }
        Ok(())
    }
}

impl Index<usize> for DynamicList {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.items[index]
    }
}

impl FromIterator<Value> for DynamicList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        DynamicList::from_vec(iter.into_iter().collect())
    }
}

impl From<Vec<Value>> for DynamicList {
    fn from(items: Vec<Value>) -> Self {
        DynamicList::from_vec(items)
    }
}
