use std::rc::Rc;
use derivative::Derivative;
use crate::active::ActiveSubscriber;
use crate::error::{BoxError, Error};
use crate::object::Object;
use crate::path::Path;
use crate::subject::Subscriber;
use crate::uid::SubscriberId;
use crate::value::Value;

/// Interest in the value at a [Path]: `on_change` gets the freshly resolved value
/// whenever a property read while the subscription was created changes.
///
/// Subjects only hold weak references, so the subscription stops firing once every clone of it is dropped.
///
/// Dependencies are recorded once, on creation. [Subscription::update] re-reads the path without
/// recording, so if an intermediate object is replaced, the properties of the new object
/// aren't tracked (changes to the replaced property itself still are).
#[derive(Debug, Clone)]
#[must_use = "the subscription stops as soon as it is dropped"]
pub struct Subscription(Rc<SubscriptionImpl>);

#[derive(Derivative)]
#[derivative(Debug)]
struct SubscriptionImpl {
    id: SubscriberId,
    root: Object,
    path: Path,
    #[derivative(Debug = "ignore")]
    on_change: Box<dyn Fn(&Value) -> Result<(), BoxError>>
}

impl Subscription {
    /// Subscribe to `path` under `root`.
    ///
    /// This resolves the path once with the new subscription active, which registers it with every
    /// property along the path. Fails (and registers nothing live) if the path doesn't resolve.
    pub fn new<F: Fn(&Value) -> Result<(), BoxError> + 'static>(root: &Object, path: Path, on_change: F) -> Result<Self, Error> {
        let subscription = Rc::new(SubscriptionImpl {
            id: SubscriberId::next(),
            root: root.clone(),
            path,
            on_change: Box::new(on_change)
        });
        let subscriber: Rc<dyn Subscriber> = subscription.clone();
        {
            let _active = ActiveSubscriber::activate(&subscriber);
            subscription.path.resolve(&subscription.root)?;
        }
        log::debug!("subscription {} on `{}` under object {}", subscription.id, subscription.path, subscription.root.id());
        Ok(Subscription(subscription))
    }

    pub fn id(&self) -> SubscriberId {
        self.0.id
    }

    pub fn path(&self) -> &Path {
        &self.0.path
    }

    /// Resolve the path now. Not cached, and doesn't register anything.
    pub fn value(&self) -> Result<Value, Error> {
        self.0.resolve()
    }

    /// Resolve the path and call `on_change` with the result.
    pub fn update(&self) -> Result<(), Error> {
        self.0.update()
    }
}

impl SubscriptionImpl {
    fn resolve(&self) -> Result<Value, Error> {
        ActiveSubscriber::untracked(|| self.path.resolve(&self.root))
    }
}

impl Subscriber for SubscriptionImpl {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn update(&self) -> Result<(), Error> {
        let value = self.resolve()?;
        (self.on_change)(&value).map_err(|source| Error::Callback {
            path: self.path.to_string(),
            source
        })
    }
}
