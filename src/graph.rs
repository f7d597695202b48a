use std::mem::take;
use std::rc::Rc;
use crate::object::{Object, Slot};
use crate::subject::PropertySubject;
use crate::value::Value;

/// Make `value` reactive if it's an object, recursively. Primitives are left alone.
pub fn instrument(value: &Value) {
    if let Value::Object(object) = value {
        object.instrument();
    }
}

/// A reactive property: the current value, and the subject which tracks who read it.
///
/// The subject is shared only so it can be used after the object's slots are released
/// (subscribers read the same object while being notified).
pub(crate) struct ReactiveProperty {
    value: Value,
    subject: Rc<PropertySubject>
}

impl ReactiveProperty {
    fn new(value: Value) -> Self {
        ReactiveProperty {
            value,
            subject: Rc::new(PropertySubject::new())
        }
    }

    /// The value, and the subject to [depend](PropertySubject::depend) on once the slot isn't borrowed.
    pub(crate) fn read(&self) -> (Value, Rc<PropertySubject>) {
        (self.value.clone(), self.subject.clone())
    }

    /// Store `value` and return the subject to notify, or `None` if it equals the current value.
    pub(crate) fn write(&mut self, value: Value) -> Option<Rc<PropertySubject>> {
        if self.value == value {
            return None;
        }
        self.value = value;
        Some(self.subject.clone())
    }

    pub(crate) fn subject(&self) -> &PropertySubject {
        &self.subject
    }
}

impl Object {
    /// Turn every plain key this object has into a reactive property, instrumenting the values first.
    ///
    /// Keys which are already reactive keep their property (and subscribers).
    /// Keys added afterwards are plain until this object is instrumented again,
    /// which happens whenever it's assigned to a reactive property.
    pub fn instrument(&self) {
        if self.0.instrumenting.replace(true) {
            // Cycle back to an object we're already walking
            return;
        }
        let plain = self.0.slots.borrow()
            .iter()
            .filter_map(|(key, slot)| match slot {
                Slot::Plain(value) => Some((key.clone(), value.clone())),
                _ => None
            })
            .collect::<Vec<_>>();
        for (key, value) in &plain {
            instrument(value);
            let mut slots = self.0.slots.borrow_mut();
            if let Some(slot) = slots.get_mut(key) {
                if let Slot::Plain(value) = slot {
                    let value = take(value);
                    *slot = Slot::Reactive(ReactiveProperty::new(value));
                }
            }
        }
        self.0.instrumenting.set(false);
        log::trace!("instrumented {} key(s) of object {}", plain.len(), self.id());
    }
}
