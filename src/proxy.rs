use crate::error::{BoxError, Error};
use crate::object::{Object, Slot};
use crate::path::Path;
use crate::subscription::Subscription;
use crate::value::Value;

/// For every key `source` has now, put an accessor on `target` which reads and writes `source`'s key.
///
/// Writes through `target` go through `source`'s own setter, so if `source` is instrumented they
/// notify like any other write. Keys `source` gains later aren't mounted.
pub fn mount(target: &Object, source: &Object) {
    let keys = source.keys();
    let mut slots = target.0.slots.borrow_mut();
    for key in &keys {
        slots.insert(key.clone(), Slot::Forward(source.clone()));
    }
    log::trace!("mounted {} key(s) of object {} on object {}", keys.len(), source.id(), target.id());
}

/// Reactive data, plus a proxy object exposing its top-level keys directly.
///
/// This is what bindings talk to: `vm.set("a", 2)` instead of reaching into [ViewModel::data].
#[derive(Debug, Clone)]
pub struct ViewModel {
    data: Object,
    proxy: Object
}

impl ViewModel {
    /// Instrument `data` and mount its keys on a fresh proxy.
    pub fn new(data: Object) -> Self {
        data.instrument();
        let proxy = Object::new();
        mount(&proxy, &data);
        ViewModel { data, proxy }
    }

    /// Like [ViewModel::new], for JSON data. Fails unless the JSON is an object or array.
    pub fn from_json(data: serde_json::Value) -> Result<Self, Error> {
        Ok(Self::new(Object::from_json(data)?))
    }

    /// The instrumented data.
    pub fn data(&self) -> &Object {
        &self.data
    }

    /// The object forwarding to [ViewModel::data].
    pub fn proxy(&self) -> &Object {
        &self.proxy
    }

    /// Read a top-level key through the proxy.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.proxy.get(key)
    }

    /// Write a top-level key through the proxy.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        self.proxy.set(key, value)
    }

    /// Read the value at a dot-path, starting at the proxy.
    pub fn resolve(&self, path: &str) -> Result<Value, Error> {
        path.parse::<Path>()?.resolve(&self.proxy)
    }

    /// Subscribe to a dot-path, starting at the proxy.
    pub fn watch<F: Fn(&Value) + 'static>(&self, path: &str, on_change: F) -> Result<Subscription, Error> {
        crate::subscribe(&self.proxy, path, on_change)
    }

    /// Subscribe to a dot-path with a callback which may fail.
    pub fn try_watch<F: Fn(&Value) -> Result<(), BoxError> + 'static>(&self, path: &str, on_change: F) -> Result<Subscription, Error> {
        crate::try_subscribe(&self.proxy, path, on_change)
    }
}
