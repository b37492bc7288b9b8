//! Owner back-references and teardown hooks
//!
//! A list field points back at the record that owns it. The link is a
//! [`Weak`] handle so the field never keeps its owner alive, and it is
//! exposed to whatever reclaims record graphs through [`Collectable`]:
//! `traverse` reports outgoing references, `clear_refs` drops them. Every
//! hook is idempotent and safe on a half torn-down list.

use crate::value::Value;
use alloc::rc::{Rc, Weak};
use core::fmt;
use core::ops::ControlFlow;

/// The record that owns a list field
pub trait HostRecord {
    /// Record type name, for diagnostics
    fn type_name(&self) -> &str;
}

/// Non-owning link from a list field to its record
#[derive(Default)]
pub struct OwnerRef {
    link: Option<Weak<dyn HostRecord>>,
}

impl OwnerRef {
    /// Link to `owner` without keeping it alive
    pub fn new(owner: Weak<dyn HostRecord>) -> Self {
        Self { link: Some(owner) }
    }

    /// A link that points nowhere
    pub fn detached() -> Self {
        Self { link: None }
    }

    /// Drop the link; calling it again is a no-op
    pub fn release(&mut self) {
        self.link = None;
    }

    /// True until [`release`](Self::release) runs
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    /// The owner, if linked and still alive
    pub fn upgrade(&self) -> Option<Rc<dyn HostRecord>> {
        self.link.as_ref().and_then(Weak::upgrade)
    }

    /// True if this links to the same allocation as `record`
    pub fn points_to<R: HostRecord + 'static>(&self, record: &Rc<R>) -> bool {
        match &self.link {
            Some(link) => core::ptr::addr_eq(link.as_ptr(), Rc::as_ptr(record)),
            None => false,
        }
    }
}

impl fmt::Debug for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(owner) => write!(f, "OwnerRef({})", owner.type_name()),
            None if self.is_linked() => write!(f, "OwnerRef(<dropped>)"),
            None => write!(f, "OwnerRef(<detached>)"),
        }
    }
}

/// Receives the references a collectable object reports
///
/// Returning `ControlFlow::Break` stops the walk early.
pub trait Visitor {
    /// Called once with the owner link, if one is held
    fn visit_owner(&mut self, owner: &OwnerRef) -> ControlFlow<()>;

    /// Called for each element the object holds
    fn visit_value(&mut self, value: &Value) -> ControlFlow<()>;
}

/// Teardown protocol for objects that may sit in a reference cycle
pub trait Collectable {
    /// Report every outgoing reference to `visitor`
    fn traverse(&self, visitor: &mut dyn Visitor) -> ControlFlow<()>;

    /// Drop every outgoing reference
    fn clear_refs(&mut self);
}
