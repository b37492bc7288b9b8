//! The list field a script is replayed against

use anyhow::{bail, Context, Result};
use std::rc::{Rc, Weak};
use structlist_core::{
    construct, DynamicList, ElementStorage, EnumMeta, EnumValue, FieldType, HostRecord, Sequence,
    StructList, Value,
};

/// Declared element type selectable on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ElementKind {
    /// Plain list with no typed mirror
    Standalone,
    /// `bool` elements
    Bool,
    /// 64-bit integers
    Int,
    /// Doubles (integers widen)
    Float,
    /// Strings
    Str,
    /// Enum members by name (see `--enum-variants`)
    Enum,
    /// Lists of integers
    IntList,
    /// Any value
    Object,
}

/// Element kind plus the enum metadata it may need
#[derive(Clone, Debug)]
pub struct FieldSpec {
    /// Declared element kind
    pub kind: ElementKind,
    /// Variant names for [`ElementKind::Enum`]
    pub enum_variants: Vec<String>,
}

impl FieldSpec {
    /// Spec with no enum variants
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            enum_variants: Vec::new(),
        }
    }

    /// Field type descriptor, or `None` for a standalone list
    pub fn field_type(&self) -> Result<Option<FieldType>> {
        let ty = match self.kind {
            ElementKind::Standalone => return Ok(None),
            ElementKind::Bool => FieldType::Bool,
            ElementKind::Int => FieldType::Int,
            ElementKind::Float => FieldType::Float,
            ElementKind::Str => FieldType::Str,
            ElementKind::Enum => {
                if self.enum_variants.is_empty() {
                    bail!("--type enum requires --enum-variants");
                }
                FieldType::Enum(EnumMeta::new("Variant", self.enum_variants.iter().cloned()))
            }
            ElementKind::IntList => FieldType::list_of(FieldType::Int),
            ElementKind::Object => FieldType::Object,
        };
        Ok(Some(ty))
    }
}

/// Stand-in record owning the field during a replay
pub struct ScriptRecord;

impl HostRecord for ScriptRecord {
    fn type_name(&self) -> &str {
        "ScriptRecord"
    }
}

/// A list of any supported element type
pub enum Target {
    /// Plain list
    Standalone(DynamicList),
    /// `List[bool]`
    Bool(StructList<bool>),
    /// `List[int]`
    Int(StructList<i64>),
    /// `List[float]`
    Float(StructList<f64>),
    /// `List[str]`
    Str(StructList<String>),
    /// `List[<enum>]`
    Enum(StructList<EnumValue>),
    /// `List[List[int]]`
    IntList(StructList<Vec<i64>>),
    /// `List[object]`
    Object(StructList<Value>),
}

macro_rules! each_field {
    ($target:expr, $list:ident => $body:expr, standalone $plain:ident => $alt:expr) => {
        match $target {
            Target::Standalone($plain) => $alt,
            Target::Bool($list) => $body,
            Target::Int($list) => $body,
            Target::Float($list) => $body,
            Target::Str($list) => $body,
            Target::Enum($list) => $body,
            Target::IntList($list) => $body,
            Target::Object($list) => $body,
        }
    };
}

/// Bind a typed field of storage `S` to `owner`
fn bind<S: ElementStorage>(
    field_type: &FieldType,
    owner: Weak<dyn HostRecord>,
    initial: Vec<Value>,
) -> Result<StructList<S>> {
    construct::bound(field_type.clone(), owner, initial)
        .with_context(|| format!("initial values do not fit {}", field_type))
}

impl Target {
    /// Build the list for `spec`, seeded with `initial` and owned by `record`
    pub fn build(spec: &FieldSpec, record: &Rc<ScriptRecord>, initial: Vec<Value>) -> Result<Self> {
        let field_type = match spec.field_type()? {
            Some(ty) => ty,
            None => return Ok(Target::Standalone(construct::standalone(initial))),
        };
        let owner = Rc::downgrade(record) as Weak<dyn HostRecord>;

        let target = match &field_type {
            FieldType::Bool => Target::Bool(bind(&field_type, owner, initial)?),
            FieldType::Int => Target::Int(bind(&field_type, owner, initial)?),
            FieldType::Float => Target::Float(bind(&field_type, owner, initial)?),
            FieldType::Str => Target::Str(bind(&field_type, owner, initial)?),
            FieldType::Enum(_) => Target::Enum(bind(&field_type, owner, initial)?),
            FieldType::List(_) => Target::IntList(bind(&field_type, owner, initial)?),
            FieldType::Object => Target::Object(bind(&field_type, owner, initial)?),
        };
        Ok(target)
    }

    /// The list through the generic protocol
    pub fn sequence(&self) -> &dyn Sequence {
        each_field!(self, list => list as &dyn Sequence, standalone plain => plain as &dyn Sequence)
    }

    /// The list through the generic protocol, mutably
    pub fn sequence_mut(&mut self) -> &mut dyn Sequence {
        each_field!(
            self,
            list => list as &mut dyn Sequence,
            standalone plain => plain as &mut dyn Sequence
        )
    }

    /// The typed mirror as dynamic values, if there is one
    pub fn mirror(&self) -> Option<Vec<Value>> {
        each_field!(self, list => Some(list.mirror_values()), standalone _plain => None)
    }

    /// True if the typed mirror matches the front view (always true when standalone)
    pub fn is_synchronized(&self) -> bool {
        each_field!(self, list => list.is_synchronized(), standalone _plain => true)
    }

    /// Display form of the declared element type
    pub fn describe(&self) -> String {
        each_field!(
            self,
            list => format!("List[{}]", list.field_type()),
            standalone _plain => "list".to_string()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_requires_variants() {
        assert!(FieldSpec::new(ElementKind::Enum).field_type().is_err());
        let spec = FieldSpec {
            kind: ElementKind::Enum,
            enum_variants: vec!["A".into(), "B".into()],
        };
        assert!(matches!(spec.field_type().unwrap(), Some(FieldType::Enum(_))));
    }

    #[test]
    fn test_build_links_owner() {
        let record = Rc::new(ScriptRecord);
        let target = Target::build(&FieldSpec::new(ElementKind::Int), &record, vec![Value::Int(1)]).unwrap();
        match &target {
            Target::Int(list) => assert!(list.owner().points_to(&record)),
            _ => panic!("expected an int field"),
        }
        assert_eq!(target.describe(), "List[int]");
        assert_eq!(target.mirror(), Some(vec![Value::Int(1)]));
    }

    #[test]
    fn test_standalone_has_no_mirror() {
        let record = Rc::new(ScriptRecord);
        let target = Target::build(
            &FieldSpec::new(ElementKind::Standalone),
            &record,
            vec![Value::None, Value::from("x")],
        )
        .unwrap();
        assert!(target.mirror().is_none());
        assert!(target.is_synchronized());
        assert_eq!(target.sequence().len(), 2);
    }

    #[test]
    fn test_every_kind_builds_its_own_target() {
        let record = Rc::new(ScriptRecord);
        let cases = [
            (ElementKind::Standalone, "list"),
            (ElementKind::Bool, "List[bool]"),
            (ElementKind::Int, "List[int]"),
            (ElementKind::Float, "List[float]"),
            (ElementKind::Str, "List[str]"),
            (ElementKind::Enum, "List[Variant]"),
            (ElementKind::IntList, "List[List[int]]"),
            (ElementKind::Object, "List[object]"),
        ];
        for (kind, expected) in cases {
            let spec = FieldSpec {
                kind,
                enum_variants: vec!["A".into()],
            };
            let target = Target::build(&spec, &record, Vec::new()).unwrap();
            assert_eq!(target.describe(), expected, "{:?}", kind);
            assert_eq!(target.mirror().is_none(), kind == ElementKind::Standalone);
        }
    }

    #[test]
    fn test_bad_initial_values() {
        let record = Rc::new(ScriptRecord);
        let err = Target::build(&FieldSpec::new(ElementKind::Bool), &record, vec![Value::Int(1)])
            .err()
            .unwrap();
        assert!(err.to_string().contains("initial values do not fit bool"));
    }
}
