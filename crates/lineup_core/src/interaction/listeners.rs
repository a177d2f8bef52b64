//! Registry of input listeners attached to the hosting document.
//!
//! A listener lives exactly as long as its `ListenerGuard`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerUp,
}

#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    active: Rc<RefCell<Vec<(u64, ListenerKind)>>>,
    next_id: Rc<Cell<u64>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "the listener is removed as soon as the guard is dropped"]
    pub fn register(&self, kind: ListenerKind) -> ListenerGuard {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.active.borrow_mut().push((id, kind));
        ListenerGuard { id, active: Rc::clone(&self.active) }
    }

    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_registered(&self, kind: ListenerKind) -> bool {
        self.active.borrow().iter().any(|(_, registered)| *registered == kind)
    }
}

#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    active: Rc<RefCell<Vec<(u64, ListenerKind)>>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let mut active = self.active.borrow_mut();
        active.retain(|(id, _)| *id != self.id);
    }
}
