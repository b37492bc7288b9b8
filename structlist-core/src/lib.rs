//! # Structlist Core
//!
//! List fields for typed records: callers get a fully dynamic list, the
//! record gets a typed contiguous mirror, and every mutation keeps the two
//! in lockstep or leaves both untouched.
//!
//! ## Modules
//!
//! - `constants`: Length limits and defaults
//! - `value`: Dynamic element values
//! - `slice`: Slice resolution
//! - `engine`: The dynamic list engine backing the front view
//! - `types`: Field type descriptors
//! - `convert`: Element conversion into typed storage
//! - `sequence`: The list protocol shared by plain and synchronized lists
//! - `struct_list`: The synchronized list field
//! - `lifecycle`: Owner links and teardown hooks
//! - `construct`: Standalone versus record-bound construction
//! - `dispatch`: Name-based method calls and operators on dynamic operands

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod constants;
pub mod construct;
pub mod convert;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod sequence;
pub mod slice;
pub mod struct_list;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use convert::ElementStorage;
pub use engine::{DynamicList, SortOptions};
pub use error::ListError;
pub use lifecycle::{Collectable, HostRecord, OwnerRef, Visitor};
pub use sequence::Sequence;
pub use slice::SliceSpec;
pub use struct_list::StructList;
pub use types::{EnumMeta, EnumValue, FieldType};
pub use value::Value;

/// Result type alias for list operations
pub type Result<T> = core::result::Result<T, ListError>;
