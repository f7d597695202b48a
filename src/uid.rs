use std::cell::Cell;
use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;
use std::thread_local;
use derivative::Derivative;

/// Thread-unique id, typed by what it identifies so object and subscriber ids can't be mixed up.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), PartialEq(bound = ""), Eq(bound = ""), Hash(bound = ""))]
pub struct Uid<Tag>(usize, PhantomData<Tag>);

/// Tags [Uid]s of [Object](crate::Object)s.
#[derive(Debug)]
pub enum ObjectTag {}

/// Tags [Uid]s of [Subscriber](crate::Subscriber)s.
#[derive(Debug)]
pub enum SubscriberTag {}

pub type ObjectId = Uid<ObjectTag>;
pub type SubscriberId = Uid<SubscriberTag>;

thread_local! {
    static UID: Cell<usize> = Cell::new(0);
}

impl<Tag> Uid<Tag> {
    /// Allocate a fresh id. Ids are never reused on a thread.
    pub fn next() -> Uid<Tag> {
        UID.with(|uid_cell| {
            let uid = uid_cell.get() + 1;
            uid_cell.set(uid);
            Uid(uid, PhantomData)
        })
    }
}

impl<Tag> Display for Uid<Tag> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl<Tag> Debug for Uid<Tag> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Uid(#{})", self.0)
    }
}
