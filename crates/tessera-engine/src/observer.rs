//! Change notification for shared logic-thread containers.
//!
//! Containers own an [`ObserverList`]; subscribers keep the returned
//! [`Subscription`] alive for as long as they want callbacks. Dropping it
//! unsubscribes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn()>;

#[derive(Default)]
struct Slots {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

#[derive(Default, Clone)]
pub struct ObserverList {
    slots: Rc<RefCell<Slots>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.callbacks.push((id, Rc::new(callback)));
        Subscription { slots: Rc::downgrade(&self.slots), id }
    }

    /// Invokes every callback synchronously, in subscription order.
    ///
    /// Callbacks may subscribe or unsubscribe while being notified; changes apply
    /// from the next notification.
    pub fn notify(&self) {
        let callbacks: Vec<Callback> =
            self.slots.borrow().callbacks.iter().map(|(_, cb)| Rc::clone(cb)).collect();
        for cb in callbacks {
            cb();
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a callback registered; unsubscribes on drop.
pub struct Subscription {
    slots: Weak<RefCell<Slots>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.borrow_mut().callbacks.retain(|(id, _)| *id != self.id);
        }
    }
}
