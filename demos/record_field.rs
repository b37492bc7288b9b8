//! A record with a typed list field

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use structlist_core::{
    construct, dispatch, FieldType, HostRecord, Sequence, SortOptions, StructList, Value,
};

struct Sensor {
    readings: RefCell<StructList<f64>>,
}

impl HostRecord for Sensor {
    fn type_name(&self) -> &str {
        "Sensor"
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Structlist Record Field Example\n");

    // The field links back to its record without keeping it alive
    let sensor = Rc::new_cyclic(|me: &Weak<Sensor>| {
        let owner = me.clone() as Weak<dyn HostRecord>;
        let readings = construct::bound(FieldType::Float, owner, vec![Value::Float(20.5)])
            .expect("seed readings convert");
        Sensor {
            readings: RefCell::new(readings),
        }
    });

    {
        let mut readings = sensor.readings.borrow_mut();
        readings.append(Value::Int(19))?;
        readings.extend(vec![Value::Float(22.25), Value::Float(18.0)])?;
        readings.sort(&SortOptions::new())?;
        println!("Front view: {}", Value::List(readings.values().to_vec()));
        println!("Typed view: {:?}", readings.typed());

        // A value that does not fit is rejected and nothing changes
        if let Err(e) = readings.append(Value::from("warm")) {
            println!("Rejected: {}", e);
        }
        println!("Still {} readings", readings.len());

        // The same operations are reachable by name
        dispatch::call_method(&mut *readings, "pop", &[Value::Int(0)], &[])?;
        dispatch::inplace_repeat(&mut *readings, &Value::Int(2))?;
        println!("After pop(0) and *= 2: {:?}", readings.typed());
    }

    // A list built outside a record has no typed view at all
    let mut scratch = construct::standalone(vec![Value::None, Value::from("anything")]);
    scratch.append(Value::Bool(true))?;
    println!("\nStandalone list: {}", Value::List(scratch.into_vec()));

    Ok(())
}
