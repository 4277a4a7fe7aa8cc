//! Outcome families with direct-style extraction.
//!
//! Four families share the [`Control`] contract: [`Presence`], [`Either`],
//! [`Try`] and [`Validation`]. Each one can run a body as a *boundary*:
//! inside it, an extractor turns a nested outcome into its positive payload,
//! or stops the body so the boundary returns the negative outcome as-is.
//!
//! ```
//! use control::{Control, Either};
//!
//! fn parse(input: &str) -> Either<String, u32> {
//!     input.parse::<u32>().map_err(|_| format!("not a number: {}", input)).into()
//! }
//!
//! let sum = Either::direct(|s| Ok(s.extract(parse("40"))? + s.extract(parse("2"))?));
//! assert_eq!(sum.get(), 42);
//!
//! let broken = Either::direct(|s| Ok(s.extract(parse("40"))? + s.extract(parse("x"))?));
//! assert_eq!(broken, Either::left("not a number: x".to_string()));
//! ```
//!
//! Boundaries nest through the `scoped` entry points, whose result has to be
//! propagated with `?` so an escape meant for an outer boundary keeps
//! travelling.

mod attempt;
mod boundary;
mod cause;
mod control;
mod either;
mod error;
mod iter;
mod presence;
mod validation;

pub use attempt::{Try, TryExtractor};
pub use boundary::{BoundaryState, Escape, Scoped};
pub use cause::{is_fatal, Cause};
pub use control::Control;
pub use either::{Either, EitherExtractor};
pub use error::{NoSuchElement, Panicked};
pub use iter::{IntoIter, Iter};
pub use presence::{Presence, PresenceExtractor};
pub use validation::{
    Builder2, Builder3, Builder4, Builder5, Builder6, Builder7, Builder8, Validation,
    ValidationExtractor,
};
