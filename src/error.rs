use thiserror::Error;

/// Error a subscriber callback may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong while tracking reads or propagating writes.
///
/// None of these are transient: they are all bad paths, bad data, or failing callbacks,
/// so nothing in this crate retries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid path `{0}`: paths are non-empty and have no empty segments")]
    InvalidPath(String),
    #[error("cannot resolve `{path}`: read `{segment}` on a {found}")]
    PathResolution {
        path: String,
        segment: String,
        found: &'static str
    },
    #[error("cannot resolve `{path}`: no key `{segment}`")]
    MissingKey {
        path: String,
        segment: String
    },
    #[error("expected an object, got a {found}")]
    NotAnObject {
        found: &'static str
    },
    #[error("subscriber on `{path}` failed: {source}")]
    Callback {
        path: String,
        #[source]
        source: BoxError
    },
    #[error("{} subscriber(s) failed during notify", .0.len())]
    Notify(Vec<Error>),
    #[error("change propagation nested deeper than {limit} notifies (self-triggering subscriber?)")]
    PropagationDepthExceeded {
        limit: usize
    }
}

impl Error {
    /// Failures collected by a notify, or just this error if it isn't one.
    pub fn failures(&self) -> &[Error] {
        match self {
            Error::Notify(failures) => failures,
            other => std::slice::from_ref(other)
        }
    }
}
