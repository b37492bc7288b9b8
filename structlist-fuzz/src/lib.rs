//! Byte-driven harnesses for structlist-core synchronized fields
//!
//! `fuzz_ops` and `fuzz_dispatch` take arbitrary bytes and panic only if a
//! field ends up out of sync or a failed operation changed it. They have the
//! `fn(&[u8])` shape a libFuzzer target body expects. The tests below drive
//! them with fixed byte patterns.

use structlist_core::dispatch::{self, Subscript};
use structlist_core::{
    DynamicList, FieldType, OwnerRef, Sequence, SliceSpec, SortOptions, StructList, Value,
};

fn value_from(byte: u8) -> Value {
    match byte % 8 {
        0 => Value::None,
        1 => Value::from("s"),
        2 => Value::Float(f64::from(byte) / 4.0),
        _ => Value::Int(i64::from(byte % 16) - 8),
    }
}

fn index_from(byte: u8) -> i64 {
    i64::from(byte as i8 % 12)
}

fn slice_from(a: u8, b: u8) -> SliceSpec {
    let bound = |x: u8| if x % 3 == 0 { None } else { Some(index_from(x)) };
    let step = match b % 5 {
        0 => None,
        1 => Some(-1),
        2 => Some(2),
        3 => Some(-3),
        _ => Some(0),
    };
    SliceSpec::new(bound(a), bound(b), step)
}

fn apply(list: &mut dyn Sequence, op: u8, a: u8, b: u8) -> bool {
    let result = match op % 14 {
        0 => list.append(value_from(a)),
        1 => list.insert(index_from(a), value_from(b)),
        2 => list.pop(if a % 2 == 0 { None } else { Some(index_from(b)) }).map(|_| ()),
        3 => list.remove(&value_from(a)),
        4 => {
            list.reverse();
            Ok(())
        }
        5 => {
            list.clear();
            Ok(())
        }
        6 => list.extend(vec![value_from(a), value_from(b)]),
        7 => list.sort(&SortOptions::new().reverse(a % 2 == 1)),
        8 => list.set_item(index_from(a), value_from(b)),
        9 => list.del_item(index_from(a)),
        10 => list.set_slice(&slice_from(a, b), vec![value_from(b); usize::from(a % 3)]),
        11 => list.del_slice(&slice_from(a, b)),
        // Keep growth bounded across long inputs
        12 if list.len() > 64 => list.repeat_in_place(1),
        12 => list.repeat_in_place(i64::from(a % 3)),
        _ => dispatch::assign_subscript(list, &Subscript::Index(index_from(a)), None),
    };
    result.is_ok()
}

/// Drive an int field and a plain list with the same byte-encoded operations
///
/// Panics if the field's views diverge, if a failed operation changes
/// either view, or if a successful one leaves the front different from
/// the plain list.
pub fn fuzz_ops(data: &[u8]) {
    let mut field = match StructList::<i64>::new(FieldType::Int, OwnerRef::detached()) {
        Ok(field) => field,
        Err(_) => return,
    };
    let mut model = DynamicList::new();

    for chunk in data.chunks_exact(3).take(256) {
        let (op, a, b) = (chunk[0], chunk[1], chunk[2]);
        let before_front = field.values().to_vec();
        let before_back = field.typed().to_vec();

        let mut expected = model.clone();
        let model_ok = apply(&mut expected, op, a, b);

        if apply(&mut field, op, a, b) {
            assert!(model_ok, "field accepted what a plain list rejected");
            assert_eq!(field.values(), expected.as_slice());
            model = expected;
        } else {
            assert_eq!(field.values(), before_front.as_slice());
            assert_eq!(field.typed(), before_back.as_slice());
        }
        assert!(field.is_synchronized());
    }
}

/// Feed bytes through the dynamic method protocol of an object field
pub fn fuzz_dispatch(data: &[u8]) {
    const METHODS: [&str; 12] = [
        "append", "insert", "pop", "remove", "reverse", "sort", "extend", "clear", "index",
        "count", "copy", "bogus",
    ];

    let mut field = match StructList::<Value>::new(FieldType::Object, OwnerRef::detached()) {
        Ok(field) => field,
        Err(_) => return,
    };

    for chunk in data.chunks_exact(3).take(256) {
        let method = METHODS[usize::from(chunk[0]) % METHODS.len()];
        let args: Vec<Value> = (0..chunk[1] % 3).map(|i| value_from(chunk[2].wrapping_add(i))).collect();
        let _ = dispatch::call_method(&mut field, method, &args, &[]);
        assert!(field.is_synchronized());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzz_ops_empty() {
        fuzz_ops(&[]);
    }

    #[test]
    fn test_fuzz_ops_random() {
        let data: Vec<u8> = (0u16..900).map(|i| (i.wrapping_mul(37) % 251) as u8).collect();
        fuzz_ops(&data);
    }

    #[test]
    fn test_fuzz_ops_every_opcode() {
        let mut data = Vec::new();
        for op in 0..14u8 {
            data.extend_from_slice(&[op, 3, 5, op, 200, 1]);
        }
        fuzz_ops(&data);
    }

    #[test]
    fn test_harnesses_take_raw_bytes() {
        let targets: [fn(&[u8]); 2] = [fuzz_ops, fuzz_dispatch];
        for target in targets {
            target(b"\x00\x01\x02\x0c\x02\x00\x05\x80\x01");
        }
    }

    #[test]
    fn test_fuzz_dispatch_random() {
        fuzz_dispatch(&[0xFF; 1024]);
        let data: Vec<u8> = (0u16..600).map(|i| (i * 7 % 256) as u8).collect();
        fuzz_dispatch(&data);
    }
}
