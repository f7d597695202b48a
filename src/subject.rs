use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};
use std::thread_local;
use crate::active::ActiveSubscriber;
use crate::config::Config;
use crate::error::Error;
use crate::uid::SubscriberId;

/// Something which wants to re-run when a property it read changes.
///
/// [Subscription](crate::Subscription) is the implementation you normally want,
/// but anything can register itself by being [active](ActiveSubscriber) while it reads.
pub trait Subscriber {
    /// Identifies this subscriber, so a subject doesn't register it twice.
    fn id(&self) -> SubscriberId;

    /// Called synchronously after a property this subscriber registered with changed.
    fn update(&self) -> Result<(), Error>;
}

/// The subscribers of a single reactive property: one per (object, key) pair.
///
/// Subjects only hold weak back-references. A subscriber whose owner dropped it is skipped,
/// and its registration is removed on the next register or notify.
#[derive(Default)]
pub struct PropertySubject {
    subscribers: RefCell<Vec<Registration>>
}

struct Registration {
    id: SubscriberId,
    subscriber: Weak<dyn Subscriber>
}

impl Registration {
    fn is_live(&self) -> bool {
        self.subscriber.strong_count() > 0
    }
}

thread_local! {
    static NOTIFY_DEPTH: Cell<usize> = Cell::new(0);
}

/// Counts how many notifies are on the stack.
struct NotifyDepth;

impl NotifyDepth {
    fn enter() -> Result<NotifyDepth, Error> {
        let limit = Config::current().max_propagation_depth;
        NOTIFY_DEPTH.with(|depth| {
            if depth.get() >= limit {
                return Err(Error::PropagationDepthExceeded { limit });
            }
            depth.set(depth.get() + 1);
            Ok(NotifyDepth)
        })
    }
}

impl Drop for NotifyDepth {
    fn drop(&mut self) {
        NOTIFY_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

impl PropertySubject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `subscriber`, after the ones already registered. Does nothing if it's already here.
    pub fn register(&self, subscriber: &Rc<dyn Subscriber>) {
        let id = subscriber.id();
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(Registration::is_live);
        if subscribers.iter().any(|registration| registration.id == id) {
            return;
        }
        subscribers.push(Registration {
            id,
            subscriber: Rc::downgrade(subscriber)
        });
    }

    /// Register the [active subscriber](ActiveSubscriber), if there is one.
    pub fn depend(&self) {
        if let Some(subscriber) = ActiveSubscriber::current() {
            self.register(&subscriber);
        }
    }

    /// Update every live subscriber, in registration order.
    ///
    /// A failing subscriber doesn't stop the rest from running: failures are logged,
    /// collected, and returned together as [Error::Notify] once everyone has been updated.
    pub fn notify(&self) -> Result<(), Error> {
        let _depth = NotifyDepth::enter()?;
        // Snapshot, since updates may register new subscribers here
        let subscribers = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(Registration::is_live);
            subscribers.iter()
                .map(|registration| registration.subscriber.clone())
                .collect::<Vec<_>>()
        };
        log::debug!("notifying {} subscriber(s)", subscribers.len());

        let mut failures = Vec::new();
        for subscriber in subscribers.iter().filter_map(Weak::upgrade) {
            if let Err(error) = subscriber.update() {
                log::warn!("subscriber {} failed: {}", subscriber.id(), error);
                failures.push(error);
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Notify(failures))
        }
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.borrow()
            .iter()
            .filter(|registration| registration.is_live())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Debug for PropertySubject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.subscribers.borrow().iter().map(|registration| registration.id))
            .finish()
    }
}
