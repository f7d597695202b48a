//! Bare-bones data binding: plain data is instrumented so that reading a property records who read it,
//! and writing it re-runs those readers.
//!
//! [create_reactive_root] turns an [Object] (typically built from JSON) into an object graph where every
//! key is a reactive property. [subscribe] resolves a dot-path in that graph with the new [Subscription]
//! [active](ActiveSubscriber), so each property along the path registers it with its [PropertySubject].
//! Later, [Object::set] on any of those properties calls the subscription back with the freshly resolved value,
//! synchronously, before `set` returns. Assigning the same value again does nothing.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use mini_mvvm::{create_reactive_root, subscribe, Object};
//!
//! let root = create_reactive_root(Object::from_json(serde_json::json!({ "a": 1, "b": { "b": 2 } })).unwrap());
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let seen2 = seen.clone();
//! let sub = subscribe(&root, "b.b", move |value| seen2.borrow_mut().push(value.to_string())).unwrap();
//! assert_eq!(sub.value().unwrap().to_string(), "2");
//!
//! let b = root.get("b").unwrap();
//! b.as_object().unwrap().set("b", 5).unwrap();
//! b.as_object().unwrap().set("b", 5).unwrap();
//! assert_eq!(*seen.borrow(), vec!["5"]);
//! ```
//!
//! Everything is single-threaded (`Rc`, thread-local state) and synchronous. [ViewModel] bundles a root with
//! a proxy object which exposes the root's top-level keys directly, like the host object of a template.

pub(crate) mod active;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod graph;
pub(crate) mod object;
pub(crate) mod path;
pub(crate) mod proxy;
pub(crate) mod subject;
pub(crate) mod subscription;
pub(crate) mod uid;
pub(crate) mod value;

pub use active::*;
pub use config::*;
pub use error::*;
pub use graph::instrument;
pub use object::{Object, ObjectKind};
pub use path::*;
pub use proxy::*;
pub use subject::*;
pub use subscription::*;
pub use uid::*;
pub use value::*;

/// Instrument `data` in place (every key, recursively) and return it.
pub fn create_reactive_root(data: Object) -> Object {
    data.instrument();
    data
}

/// Call `on_change` with the new value at `path` whenever a property along it changes.
///
/// `path` is dot-separated, e.g. `"b.b"`. Keep the returned [Subscription] alive for as long as
/// you want callbacks.
pub fn subscribe<F: Fn(&Value) + 'static>(root: &Object, path: &str, on_change: F) -> Result<Subscription, Error> {
    try_subscribe(root, path, move |value| {
        on_change(value);
        Ok(())
    })
}

/// [subscribe] with a callback which may fail. Failures are reported to whoever made the write.
pub fn try_subscribe<F: Fn(&Value) -> Result<(), BoxError> + 'static>(root: &Object, path: &str, on_change: F) -> Result<Subscription, Error> {
    Subscription::new(root, path.parse()?, on_change)
}
