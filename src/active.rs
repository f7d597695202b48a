use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::thread_local;
use crate::subject::Subscriber;

/// The slot holding the subscriber which is currently evaluating, if any.
///
/// Property reads have no parameter saying who is reading. Instead a subscriber
/// [activates](ActiveSubscriber::activate) itself before it walks its path, and every reactive
/// property read while it's active registers it. There is one slot per thread.
///
/// The slot is only touched through [ActiveGuard]s, and a guard puts back whatever it displaced,
/// so the slot is cleared again even if the evaluation fails or unwinds.
pub struct ActiveSubscriber;

/// Keeps a subscriber active until dropped (or [ActiveGuard::deactivate]d).
#[must_use = "the subscriber is deactivated as soon as the guard is dropped"]
pub struct ActiveGuard {
    previous: Option<Weak<dyn Subscriber>>
}

thread_local! {
    static ACTIVE: RefCell<Option<Weak<dyn Subscriber>>> = RefCell::new(None);
}

impl ActiveSubscriber {
    /// Make `subscriber` the one reads get attributed to.
    pub fn activate(subscriber: &Rc<dyn Subscriber>) -> ActiveGuard {
        Self::replace(Some(Rc::downgrade(subscriber)))
    }

    /// The subscriber reads are currently attributed to.
    pub fn current() -> Option<Rc<dyn Subscriber>> {
        ACTIVE.with(|active| active.borrow().as_ref().and_then(Weak::upgrade))
    }

    /// Run `f` with no active subscriber, so its reads register nothing.
    pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
        let _guard = Self::replace(None);
        f()
    }

    fn replace(next: Option<Weak<dyn Subscriber>>) -> ActiveGuard {
        let previous = ACTIVE.with(|active| active.replace(next));
        ActiveGuard { previous }
    }
}

impl ActiveGuard {
    /// Clear the slot now instead of at the end of scope.
    pub fn deactivate(self) {}
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|active| {
            *active.borrow_mut() = previous;
        });
    }
}
