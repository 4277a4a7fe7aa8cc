use log::error;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::TryReserveError,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    io,
    sync::Arc,
};

use crate::error::NoSuchElement;

/// Reason carried by a failed `Try`.
///
/// Cloning is cheap and keeps identity: two causes are equal only when they
/// are clones of the same original error, even if their messages match.
///
/// A `Cause` can never hold an unrecoverable error, see [`is_fatal`].
#[derive(Clone)]
pub struct Cause(Arc<anyhow::Error>);

impl Cause {
    /// Wraps `error`.
    ///
    /// Unrecoverable errors are not wrapped: they are logged and re-raised
    /// right away as a panic whose payload is the original `anyhow::Error`.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        let error = error.into();
        if is_fatal(&error) {
            error!("re-raising unrecoverable failure: {:#}", error);
            std::panic::panic_any(error);
        }
        Self(Arc::new(error))
    }

    /// Cause with a plain message, the equivalent of `anyhow!`.
    pub fn msg<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self(Arc::new(anyhow::Error::msg(message)))
    }

    pub(crate) fn no_such_element(message: impl Into<String>) -> Self {
        Self(Arc::new(NoSuchElement::new(message).into()))
    }

    /// Rebuilds a cause from its message chain, outermost first.
    fn from_chain(messages: Vec<String>) -> Option<Self> {
        let mut messages = messages.into_iter().rev();
        let root = anyhow::Error::msg(messages.next()?);
        let error = messages.fold(root, |error, context| error.context(context));
        Some(Self(Arc::new(error)))
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.0
    }

    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    pub fn is<E>(&self) -> bool
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.downcast_ref::<E>().is_some()
    }

    /// Messages of the whole error chain, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = String> + '_ {
        self.0.chain().map(|cause| cause.to_string())
    }

    pub fn ptr_eq(&self, other: &Cause) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Whether `error` belongs to a category that must never be captured as a
/// failure: allocation failures and interruptions, anywhere in the chain.
pub fn is_fatal(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        if cause.is::<TryReserveError>() {
            return true;
        }
        cause.downcast_ref::<io::Error>().map_or(false, |e| {
            matches!(
                e.kind(),
                io::ErrorKind::OutOfMemory | io::ErrorKind::Interrupted
            )
        })
    })
}

/// Same as [`Cause::new`]: panics, re-raising `error`, when it is
/// unrecoverable.
impl From<anyhow::Error> for Cause {
    fn from(error: anyhow::Error) -> Self {
        Cause::new(error)
    }
}

impl PartialEq for Cause {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Cause {}

impl Hash for Cause {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&*self.0, f)
    }
}

impl Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cause")
            .field(&format_args!("{:#}", self.0))
            .finish()
    }
}

impl std::error::Error for Cause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Serialized as the message chain; the original error type is not kept.
impl Serialize for Cause {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.chain())
    }
}

impl<'de> Deserialize<'de> for Cause {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let messages = Vec::<String>::deserialize(deserializer)?;
        Cause::from_chain(messages).ok_or_else(|| D::Error::custom("cause without a message"))
    }
}
