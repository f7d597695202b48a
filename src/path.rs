use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::error::Error;
use crate::object::Object;
use crate::value::Value;

/// A non-empty sequence of keys, written `a.b.c`, which locates a value by successive lookups from a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(Vec<String>);

impl Path {
    /// Build a path from already-split segments.
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item=S>) -> Result<Self, Error> {
        let segments = segments.into_iter().map(Into::into).collect::<Vec<String>>();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(Error::InvalidPath(segments.join(".")));
        }
        Ok(Path(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Look up each segment in turn, starting at `root`.
    ///
    /// Every lookup is an ordinary [Object::get], so if a subscriber is active it gets
    /// registered with every property along the way, not just the last one.
    pub fn resolve(&self, root: &Object) -> Result<Value, Error> {
        let mut current = Value::Object(root.clone());
        for segment in &self.0 {
            let object = match &current {
                Value::Object(object) => object.clone(),
                other => return Err(Error::PathResolution {
                    path: self.to_string(),
                    segment: segment.clone(),
                    found: other.type_name()
                })
            };
            current = object.get(segment).ok_or_else(|| Error::MissingKey {
                path: self.to_string(),
                segment: segment.clone()
            })?;
        }
        Ok(current)
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Path::new(s.split('.'))
    }
}

impl TryFrom<&str> for Path {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Error> {
        s.parse()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}
