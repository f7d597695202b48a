use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use indexmap::IndexMap;
use crate::error::Error;
use crate::graph::{instrument, ReactiveProperty};
use crate::subject::PropertySubject;
use crate::uid::ObjectId;
use crate::value::Value;

/// Whether an [Object] came from a map or a list. Only matters when converting back to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Map,
    /// Keys are the indices `"0"`, `"1"`, ...
    List
}

/// Shared handle to a node in the object graph. Cloning the handle doesn't clone the object.
///
/// A fresh object is plain: reading and writing its keys does nothing special.
/// [Object::instrument] turns every key it has at that moment into a reactive property,
/// whose reads register the [active subscriber](crate::ActiveSubscriber) and whose writes
/// notify the registered subscribers.
#[derive(Clone)]
pub struct Object(pub(crate) Rc<ObjectNode>);

pub(crate) struct ObjectNode {
    pub(crate) id: ObjectId,
    pub(crate) kind: ObjectKind,
    /// Set while [Object::instrument] walks this node, so a cycle back to it stops there
    pub(crate) instrumenting: Cell<bool>,
    pub(crate) slots: RefCell<IndexMap<String, Slot>>
}

/// What sits behind a key.
pub(crate) enum Slot {
    /// Plain data, not intercepted
    Plain(Value),
    /// Intercepted accessor with its own subject
    Reactive(ReactiveProperty),
    /// Accessor which reads and writes the same key on another object
    Forward(Object)
}

/// What [Object::get] does once the slots are no longer borrowed.
enum Read {
    Tracked(Value, Rc<PropertySubject>),
    Forward(Object)
}

/// What [Object::set] does once the slots are no longer borrowed.
enum Write {
    Changed(Rc<PropertySubject>),
    Forward(Object)
}

impl Object {
    /// Create an empty plain map.
    pub fn new() -> Self {
        Self::with_kind(ObjectKind::Map)
    }

    /// Create a plain list object from its elements.
    pub fn from_list(elems: impl IntoIterator<Item=Value>) -> Self {
        let object = Self::with_kind(ObjectKind::List);
        object.0.slots.borrow_mut().extend(elems
            .into_iter()
            .enumerate()
            .map(|(index, elem)| (index.to_string(), Slot::Plain(elem))));
        object
    }

    /// Build a plain object from JSON, failing if the JSON isn't an object or array.
    pub fn from_json(json: serde_json::Value) -> Result<Self, Error> {
        match Value::from(json) {
            Value::Object(object) => Ok(object),
            other => Err(Error::NotAnObject { found: other.type_name() })
        }
    }

    fn with_kind(kind: ObjectKind) -> Self {
        Object(Rc::new(ObjectNode {
            id: ObjectId::next(),
            kind,
            instrumenting: Cell::new(false),
            slots: RefCell::new(IndexMap::new())
        }))
    }

    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.0.kind
    }

    /// Whether both handles point to the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Own keys, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.slots.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.slots.borrow().contains_key(key)
    }

    /// Read `key`. If it's a reactive property, this registers the active subscriber with it.
    pub fn get(&self, key: &str) -> Option<Value> {
        let read = match self.0.slots.borrow().get(key)? {
            Slot::Plain(value) => return Some(value.clone()),
            Slot::Reactive(property) => {
                let (value, subject) = property.read();
                Read::Tracked(value, subject)
            }
            Slot::Forward(source) => Read::Forward(source.clone())
        };
        match read {
            Read::Tracked(value, subject) => {
                subject.depend();
                Some(value)
            }
            Read::Forward(source) => source.get(key)
        }
    }

    /// Assign `value` to `key`.
    ///
    /// On a reactive property, a value equal to the current one is ignored; otherwise the value is
    /// stored, instrumented if it's an object, and the property's subscribers are notified before
    /// this returns. Their failures come back as [Error::Notify].
    ///
    /// A key that doesn't exist yet is added as a plain property: it won't be reactive
    /// unless this object is instrumented again.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        let write = {
            let mut slots = self.0.slots.borrow_mut();
            match slots.get_mut(key) {
                Some(Slot::Reactive(property)) => match property.write(value.clone()) {
                    Some(subject) => Write::Changed(subject),
                    None => return Ok(())
                },
                Some(Slot::Forward(source)) => Write::Forward(source.clone()),
                Some(Slot::Plain(plain)) => {
                    *plain = value;
                    return Ok(());
                }
                None => {
                    slots.insert(key.to_owned(), Slot::Plain(value));
                    return Ok(());
                }
            }
        };
        match write {
            Write::Changed(subject) => {
                log::trace!("object {} key `{}` changed", self.id(), key);
                instrument(&value);
                subject.notify()
            }
            Write::Forward(source) => source.set(key, value)
        }
    }

    /// Whether reads and writes of `key` are intercepted (directly or through a forwarding accessor).
    pub fn is_reactive(&self, key: &str) -> bool {
        match self.0.slots.borrow().get(key) {
            Some(Slot::Reactive(_)) => true,
            Some(Slot::Forward(source)) => source.is_reactive(key),
            Some(Slot::Plain(_)) | None => false
        }
    }

    /// How many subscribers registered with `key` (0 if it isn't reactive).
    pub fn subscriber_count(&self, key: &str) -> usize {
        match self.0.slots.borrow().get(key) {
            Some(Slot::Reactive(property)) => property.subject().len(),
            Some(Slot::Forward(source)) => source.subscriber_count(key),
            Some(Slot::Plain(_)) | None => 0
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(entries: I) -> Self {
        let object = Object::new();
        object.0.slots.borrow_mut().extend(entries
            .into_iter()
            .map(|(key, value)| (key.into(), Slot::Plain(value.into()))));
        object
    }
}

impl TryFrom<serde_json::Value> for Object {
    type Error = Error;

    fn try_from(json: serde_json::Value) -> Result<Self, Error> {
        Object::from_json(json)
    }
}

// Values aren't printed: the graph may have cycles
impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Object");
        s.field("id", &self.0.id).field("kind", &self.0.kind);
        if let Ok(slots) = self.0.slots.try_borrow() {
            s.field("keys", &slots.keys().collect::<Vec<_>>());
        }
        s.finish_non_exhaustive()
    }
}
