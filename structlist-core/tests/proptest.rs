//! Property-based tests using proptest

use proptest::prelude::*;
use structlist_core::{
    DynamicList, FieldType, OwnerRef, Sequence, SliceSpec, SortOptions, StructList, Value,
};

#[derive(Debug, Clone)]
enum Op {
    Append(Value),
    Insert(i64, Value),
    Pop(Option<i64>),
    Remove(Value),
    Reverse,
    Clear,
    Extend(Vec<Value>),
    Sort(bool),
    SetItem(i64, Value),
    DelItem(i64),
    SetSlice(SliceSpec, Vec<Value>),
    DelSlice(SliceSpec),
    Repeat(i64),
}

fn element() -> impl Strategy<Value = Value> {
    prop_oneof![
        8 => (-20i64..20).prop_map(Value::Int),
        1 => Just(Value::None),
        1 => "[a-c]".prop_map(Value::from),
    ]
}

fn slice_spec() -> impl Strategy<Value = SliceSpec> {
    (
        prop::option::of(-8i64..8),
        prop::option::of(-8i64..8),
        prop::option::of(prop_oneof![-3i64..0, 1i64..4]),
    )
        .prop_map(|(start, stop, step)| SliceSpec::new(start, stop, step))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        element().prop_map(Op::Append),
        (-8i64..8, element()).prop_map(|(i, v)| Op::Insert(i, v)),
        prop::option::of(-8i64..8).prop_map(Op::Pop),
        element().prop_map(Op::Remove),
        Just(Op::Reverse),
        Just(Op::Clear),
        prop::collection::vec(element(), 0..5).prop_map(Op::Extend),
        any::<bool>().prop_map(Op::Sort),
        (-8i64..8, element()).prop_map(|(i, v)| Op::SetItem(i, v)),
        (-8i64..8).prop_map(Op::DelItem),
        (slice_spec(), prop::collection::vec(element(), 0..4))
            .prop_map(|(s, items)| Op::SetSlice(s, items)),
        slice_spec().prop_map(Op::DelSlice),
        (-1i64..3).prop_map(Op::Repeat),
    ]
}

fn apply<L: Sequence>(list: &mut L, op: &Op) -> structlist_core::Result<()> {
    match op {
        Op::Append(v) => list.append(v.clone()),
        Op::Insert(i, v) => list.insert(*i, v.clone()),
        Op::Pop(i) => list.pop(*i).map(|_| ()),
        Op::Remove(v) => list.remove(v),
        Op::Reverse => {
            list.reverse();
            Ok(())
        }
        Op::Clear => {
            list.clear();
            Ok(())
        }
        Op::Extend(items) => list.extend(items.clone()),
        Op::Sort(reverse) => list.sort(&SortOptions::new().reverse(*reverse)),
        Op::SetItem(i, v) => list.set_item(*i, v.clone()),
        Op::DelItem(i) => list.del_item(*i),
        Op::SetSlice(spec, items) => list.set_slice(spec, items.clone()),
        Op::DelSlice(spec) => list.del_slice(spec),
        Op::Repeat(n) => list.repeat_in_place(*n),
    }
}

proptest! {
    #[test]
    fn prop_views_stay_synchronized(ops in prop::collection::vec(op(), 0..40)) {
        let mut field = StructList::<i64>::new(FieldType::Int, OwnerRef::detached()).unwrap();
        let mut model = DynamicList::new();

        for op in &ops {
            let before_front = field.values().to_vec();
            let before_back = field.typed().to_vec();

            let mut expected = model.clone();
            let model_result = apply(&mut expected, op);

            match apply(&mut field, op) {
                Ok(()) => {
                    // Whatever the field accepts, a plain list accepts identically
                    prop_assert!(model_result.is_ok(), "{:?}", op);
                    prop_assert_eq!(field.values(), expected.as_slice());
                    model = expected;
                }
                Err(_) => {
                    prop_assert_eq!(field.values(), before_front.as_slice());
                    prop_assert_eq!(field.typed(), before_back.as_slice());
                }
            }
            prop_assert!(field.is_synchronized(), "after {:?}", op);
        }
    }

    #[test]
    fn prop_object_field_matches_plain_list(ops in prop::collection::vec(op(), 0..40)) {
        let mut field = StructList::<Value>::new(FieldType::Object, OwnerRef::detached()).unwrap();
        let mut model = DynamicList::new();

        for op in &ops {
            let field_ok = apply(&mut field, op).is_ok();
            let model_ok = apply(&mut model, op).is_ok();
            prop_assert_eq!(field_ok, model_ok);
            prop_assert_eq!(field.values(), model.as_slice());
            prop_assert!(field.is_synchronized());
        }
    }

    #[test]
    fn prop_extend_is_all_or_nothing(
        seed in prop::collection::vec(-50i64..50, 0..10),
        items in prop::collection::vec(element(), 0..10)
    ) {
        let initial: Vec<Value> = seed.iter().copied().map(Value::Int).collect();
        let mut field =
            StructList::<i64>::with_values(FieldType::Int, OwnerRef::detached(), initial.clone()).unwrap();
        let all_ints = items.iter().all(|v| matches!(v, Value::Int(_)));

        let result = field.extend(items.clone());
        prop_assert_eq!(result.is_ok(), all_ints);
        if all_ints {
            prop_assert_eq!(field.len(), initial.len() + items.len());
        } else {
            prop_assert_eq!(field.values(), initial.as_slice());
        }
        prop_assert!(field.is_synchronized());
    }
}
