//! Synchronized list fields
//!
//! A [`StructList`] is the list a record hands out for one of its typed
//! fields. Callers see an ordinary dynamic list (the front view); the record
//! reads the typed mirror (the back store). Every mutation goes to the front
//! first, then the matching change is applied to the back. If the element
//! converter rejects a value, the front change is undone before the error
//! is returned, so after any call, successful or not, both views hold the
//! same elements in the same order.

use crate::constants::DEFAULT_POP_INDEX;
use crate::convert::{convert_all, ElementStorage};
use crate::engine::{DynamicList, SortOptions};
use crate::error::ListError;
use crate::lifecycle::{Collectable, OwnerRef, Visitor};
use crate::sequence::Sequence;
use crate::slice::SliceSpec;
use crate::types::FieldType;
use crate::value::Value;
use crate::Result;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::ops::ControlFlow;

#[cfg(feature = "logging")]
use tracing::{debug, error, warn};

/// A list field whose dynamic elements are mirrored into a typed store
#[derive(Debug)]
pub struct StructList<S: ElementStorage> {
    front: DynamicList,
    back: Vec<S>,
    field_type: FieldType,
    owner: OwnerRef,
}

impl<S: ElementStorage> StructList<S> {
    /// Empty field of `field_type`, linked to `owner`
    ///
    /// Fails if `S` cannot hold elements of `field_type`.
    pub fn new(field_type: FieldType, owner: OwnerRef) -> Result<Self> {
        if !S::supports(&field_type) {
            return Err(ListError::StorageMismatch {
                storage: S::STORAGE_NAME,
                field_type: field_type.to_string(),
            });
        }
        Ok(Self {
            front: DynamicList::new(),
            back: Vec::new(),
            field_type,
            owner,
        })
    }

    /// Field populated with `values`, all of which must convert
    pub fn with_values(field_type: FieldType, owner: OwnerRef, values: Vec<Value>) -> Result<Self> {
        let mut list = Self::new(field_type, owner)?;
        list.back = convert_all(&values, &list.field_type)?;
        list.front = DynamicList::from_vec(values);
        Ok(list)
    }

    /// The typed mirror, in front order
    pub fn typed(&self) -> &[S] {
        &self.back
    }

    /// The typed mirror rendered back into dynamic values
    pub fn mirror_values(&self) -> Vec<Value> {
        self.back.iter().map(ElementStorage::to_value).collect()
    }

    /// The dynamic front view
    pub fn front(&self) -> &DynamicList {
        &self.front
    }

    /// Declared element type
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Link to the owning record
    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    /// Drop the owner link, leaving the elements alone
    pub fn detach(&mut self) {
        self.owner.release();
    }

    /// True if the back holds exactly the converted front, element for element
    pub fn is_synchronized(&self) -> bool {
        self.front.len() == self.back.len()
            && self
                .front
                .as_slice()
                .iter()
                .zip(&self.back)
                .all(|(value, typed)| match S::from_value(value, &self.field_type) {
                    Ok(converted) => converted.same(typed),
                    Err(_) => false,
                })
    }

    /// Rebuild the back from the front
    ///
    /// Conversion runs into a fresh buffer; the back is replaced only if
    /// every element converts.
    pub fn resync(&mut self) -> Result<()> {
        let rebuilt = convert_all(self.front.as_slice(), &self.field_type)?;

        #[cfg(feature = "logging")]
        debug!(
            "Rebuilt {} backing store with {} elements",
            self.field_type,
            rebuilt.len()
        );

        self.back = rebuilt;
        Ok(())
    }

    fn convert_at(&self, at: usize) -> Result<S> {
        S::from_value(&self.front[at], &self.field_type)
    }

    /// Rebuild after a whole-list front change, putting `snapshot` back on failure
    fn resync_or_restore(&mut self, snapshot: DynamicList, op: &'static str) -> Result<()> {
        match self.resync() {
            Ok(()) => Ok(()),
            Err(err) => {
                self.front = snapshot;
                rolled_back(op, &err);
                Err(err)
            }
        }
    }
}

#[cfg(feature = "logging")]
fn rolled_back(op: &str, err: &ListError) {
    warn!("{} rejected by converter, front view restored: {:?}", op, err);
}

#[cfg(not(feature = "logging"))]
fn rolled_back(_op: &str, _err: &ListError) {}

impl<S: ElementStorage> Sequence for StructList<S> {
    fn values(&self) -> &[Value] {
        self.front.as_slice()
    }

    fn get(&self, index: i64) -> Result<&Value> {
        self.front.get_item(index)
    }

    fn slice(&self, spec: &SliceSpec) -> Result<DynamicList> {
        self.front.get_slice(spec)
    }

    fn index_of(&self, value: &Value, start: Option<i64>, stop: Option<i64>) -> Result<usize> {
        self.front.find(value, start, stop)
    }

    fn concat(&self, other: &[Value]) -> Result<DynamicList> {
        self.front.concat(other)
    }

    fn repeat(&self, n: i64) -> Result<DynamicList> {
        self.front.repeat(n)
    }

    fn append(&mut self, value: Value) -> Result<()> {
        let at = self.front.push(value)?;
        match self.convert_at(at) {
            Ok(typed) => {
                self.back.push(typed);
                Ok(())
            }
            Err(err) => {
                self.front.truncate(at);
                rolled_back("append", &err);
                Err(err)
            }
        }
    }

    fn insert(&mut self, index: i64, value: Value) -> Result<()> {
        let at = self.front.insert_at(index, value)?;
        match self.convert_at(at) {
            Ok(typed) => {
                self.back.insert(at, typed);
                Ok(())
            }
            Err(err) => {
                self.front.take_at(at);
                rolled_back("insert", &err);
                Err(err)
            }
        }
    }

    fn pop(&mut self, index: Option<i64>) -> Result<Value> {
        let (at, value) = self.front.pop_at(index.unwrap_or(DEFAULT_POP_INDEX))?;
        self.back.remove(at);
        Ok(value)
    }

    fn remove(&mut self, value: &Value) -> Result<()> {
        let (at, removed) = self.front.remove_first(value)?;

        // The back element at the same position must mirror what left the front
        let mirrored = match (S::from_value(&removed, &self.field_type), self.back.get(at)) {
            (Ok(expected), Some(typed)) => expected.same(typed),
            _ => false,
        };
        if !mirrored {
            #[cfg(feature = "logging")]
            error!(
                "Back store out of step at position {} while removing {}",
                at, removed
            );
            panic!("structlist: typed store does not mirror front view at position {}", at);
        }

        self.back.remove(at);
        Ok(())
    }

    fn reverse(&mut self) {
        self.front.reverse();
        self.back.reverse();
    }

    fn clear(&mut self) {
        self.front.clear();
        self.back.clear();
    }

    fn extend(&mut self, items: Vec<Value>) -> Result<()> {
        let old_len = self.front.extend_from(items)?;
        let staged = match convert_all::<S>(&self.front.as_slice()[old_len..], &self.field_type) {
            Ok(staged) => staged,
            Err(err) => {
                self.front.truncate(old_len);
                rolled_back("extend", &err);
                return Err(err);
            }
        };
        self.back.extend(staged);
        Ok(())
    }

    fn sort(&mut self, options: &SortOptions<'_>) -> Result<()> {
        let snapshot = self.front.clone();
        self.front.sort_with(options)?;
        self.resync_or_restore(snapshot, "sort")
    }

    fn set_item(&mut self, index: i64, value: Value) -> Result<()> {
        let (at, previous) = self.front.set_at(index, value)?;
        match self.convert_at(at) {
            Ok(typed) => {
                self.back[at] = typed;
                Ok(())
            }
            Err(err) => {
                self.front.replace_at(at, previous);
                rolled_back("item assignment", &err);
                Err(err)
            }
        }
    }

    fn del_item(&mut self, index: i64) -> Result<()> {
        let (at, _) = self.front.delete_at(index)?;
        self.back.remove(at);
        Ok(())
    }

    fn set_slice(&mut self, spec: &SliceSpec, items: Vec<Value>) -> Result<()> {
        let snapshot = self.front.clone();
        self.front.assign_slice(spec, items)?;
        self.resync_or_restore(snapshot, "slice assignment")
    }

    fn del_slice(&mut self, spec: &SliceSpec) -> Result<()> {
        let snapshot = self.front.clone();
        self.front.delete_slice(spec)?;
        self.resync_or_restore(snapshot, "slice deletion")
    }

    fn repeat_in_place(&mut self, n: i64) -> Result<()> {
        let old_len = self.back.len();
        self.front.repeat_in_place(n)?;
        if self.front.is_empty() {
            self.back.clear();
            return Ok(());
        }

        self.back.reserve(self.front.len() - old_len);
        for _ in 1..n {
            self.back.extend_from_within(..old_len);
        }
        Ok(())
    }
}

impl<S: ElementStorage> Collectable for StructList<S> {
    fn traverse(&self, visitor: &mut dyn Visitor) -> ControlFlow<()> {
        if self.owner.is_linked() {
            visitor.visit_owner(&self.owner)?;
        }
        self.front.traverse(visitor)
    }

    fn clear_refs(&mut self) {
        self.owner.release();
        self.front.clear_refs();
        self.back.clear();
    }
}

impl<S: ElementStorage> Drop for StructList<S> {
    fn drop(&mut self) {
        self.owner.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::HostRecord;
    use crate::types::{EnumMeta, EnumValue};
    use alloc::rc::{Rc, Weak};
    use alloc::vec;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Int).collect()
    }

    fn int_field(values: &[i64]) -> StructList<i64> {
        StructList::with_values(FieldType::Int, OwnerRef::detached(), ints(values)).unwrap()
    }

    fn snapshot<S: ElementStorage>(list: &StructList<S>) -> (Vec<Value>, Vec<S>) {
        (list.values().to_vec(), list.typed().to_vec())
    }

    #[test]
    fn test_storage_must_support_field_type() {
        let err = StructList::<i64>::new(FieldType::Str, OwnerRef::detached()).unwrap_err();
        assert_eq!(
            err,
            ListError::StorageMismatch {
                storage: "i64",
                field_type: "str".to_string()
            }
        );
    }

    #[test]
    fn test_append_and_insert_mirror() {
        let mut list = int_field(&[1, 2]);
        list.append(Value::Int(3)).unwrap();
        list.insert(-100, Value::Int(0)).unwrap();
        list.insert(100, Value::Int(4)).unwrap();
        assert_eq!(list.typed(), &[0, 1, 2, 3, 4]);
        assert!(list.is_synchronized());
    }

    #[test]
    fn test_rejected_append_leaves_both_views() {
        let mut list = int_field(&[1, 2]);
        let before = snapshot(&list);
        let err = list.append(Value::from("x")).unwrap_err();
        assert!(err.is_conversion());
        assert_eq!(snapshot(&list), before);
    }

    #[test]
    fn test_rejected_insert_and_set_item_roll_back() {
        let mut list = int_field(&[1, 2, 3]);
        let before = snapshot(&list);
        assert!(list.insert(1, Value::Float(1.5)).is_err());
        assert!(list.set_item(-1, Value::Bool(true)).is_err());
        assert_eq!(snapshot(&list), before);

        list.set_item(-1, Value::Int(30)).unwrap();
        assert_eq!(list.typed(), &[1, 2, 30]);
    }

    #[test]
    fn test_pop_and_del_item_use_resolved_index() {
        let mut list = int_field(&[10, 20, 30, 40]);
        assert_eq!(list.pop(None).unwrap(), Value::Int(40));
        assert_eq!(list.pop(Some(-3)).unwrap(), Value::Int(10));
        list.del_item(-1).unwrap();
        assert_eq!(list.typed(), &[20]);
        assert_eq!(
            list.pop(Some(5)).unwrap_err(),
            ListError::IndexOutOfRange {
                context: "pop",
                index: 5,
                len: 1
            }
        );
        list.pop(None).unwrap();
        assert_eq!(list.pop(None).unwrap_err(), ListError::PopFromEmpty);
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut list = int_field(&[5, 1, 5]);
        list.remove(&Value::Float(5.0)).unwrap();
        assert_eq!(list.typed(), &[1, 5]);
        assert_eq!(
            list.remove(&Value::Int(9)).unwrap_err(),
            ListError::NotFound("list.remove(x)")
        );
        assert!(list.is_synchronized());
    }

    #[test]
    fn test_extend_failure_truncates_front() {
        let mut list = int_field(&[1]);
        let before = snapshot(&list);
        assert!(list.extend(vec![Value::Int(2), Value::None]).is_err());
        assert_eq!(snapshot(&list), before);

        list.extend(ints(&[2, 3])).unwrap();
        assert_eq!(list.typed(), &[1, 2, 3]);
    }

    #[test]
    fn test_sort_reverse_and_repeat() {
        let mut list = int_field(&[3, 1, 2]);
        list.sort(&SortOptions::new().reverse(true)).unwrap();
        assert_eq!(list.typed(), &[3, 2, 1]);
        list.reverse();
        assert_eq!(list.typed(), &[1, 2, 3]);
        list.repeat_in_place(2).unwrap();
        assert_eq!(list.typed(), &[1, 2, 3, 1, 2, 3]);
        list.repeat_in_place(0).unwrap();
        assert!(list.typed().is_empty());
        assert!(list.is_synchronized());
    }

    #[test]
    fn test_slice_assignment_restores_on_bad_item() {
        let mut list = int_field(&[0, 1, 2, 3]);
        let before = snapshot(&list);
        let err = list
            .set_slice(&SliceSpec::range(1, 3), vec![Value::from("a")])
            .unwrap_err();
        assert!(err.is_conversion());
        assert_eq!(snapshot(&list), before);

        list.set_slice(&SliceSpec::range(1, 3), ints(&[9])).unwrap();
        assert_eq!(list.typed(), &[0, 9, 3]);
        list.del_slice(&SliceSpec::stepped(2)).unwrap();
        assert_eq!(list.typed(), &[9]);
    }

    #[test]
    fn test_float_field_widens_ints() {
        let mut list =
            StructList::<f64>::with_values(FieldType::Float, OwnerRef::detached(), vec![]).unwrap();
        list.append(Value::Int(2)).unwrap();
        list.append(Value::Float(f64::NAN)).unwrap();
        assert_eq!(list.typed()[0], 2.0);
        assert_eq!(list.values()[0], Value::Int(2));
        assert!(list.is_synchronized());
    }

    #[test]
    fn test_enum_field() {
        let ty = FieldType::Enum(EnumMeta::new("Side", ["BUY", "SELL"]));
        let mut list = StructList::<EnumValue>::new(ty, OwnerRef::detached()).unwrap();
        list.append(Value::from("SELL")).unwrap();
        assert!(list.append(Value::from("HOLD")).is_err());
        assert_eq!(list.typed()[0].ordinal, 1);
        assert_eq!(list.mirror_values(), vec![Value::from("SELL")]);
    }

    struct Holder;

    impl HostRecord for Holder {
        fn type_name(&self) -> &str {
            "Holder"
        }
    }

    struct Tally {
        owners: usize,
        values: usize,
    }

    impl Visitor for Tally {
        fn visit_owner(&mut self, _owner: &OwnerRef) -> ControlFlow<()> {
            self.owners += 1;
            ControlFlow::Continue(())
        }

        fn visit_value(&mut self, _value: &Value) -> ControlFlow<()> {
            self.values += 1;
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn test_traverse_and_clear_refs() {
        let record = Rc::new(Holder);
        let owner = OwnerRef::new(Rc::downgrade(&record) as Weak<dyn HostRecord>);
        let mut list = StructList::<i64>::with_values(FieldType::Int, owner, ints(&[1, 2])).unwrap();

        let mut tally = Tally { owners: 0, values: 0 };
        assert_eq!(list.traverse(&mut tally), ControlFlow::Continue(()));
        assert_eq!((tally.owners, tally.values), (1, 2));

        list.clear_refs();
        list.clear_refs();
        let mut tally = Tally { owners: 0, values: 0 };
        let _ = list.traverse(&mut tally);
        assert_eq!((tally.owners, tally.values), (0, 0));
        assert!(list.typed().is_empty());
        assert_eq!(Rc::strong_count(&record), 1);
    }
}
