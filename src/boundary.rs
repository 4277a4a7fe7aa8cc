use log::trace;
use std::{any::Any, cell::Cell, fmt, rc::Rc};

/// Result of a body running inside a boundary. `Err` carries an escape
/// that has to travel, via `?`, up to the boundary that minted it.
pub type Scoped<T> = Result<T, Escape>;

/// Lifecycle of a single boundary invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryState {
    Open,
    ClosedNormal,
    ClosedAborted,
}

impl BoundaryState {
    pub fn is_closed(&self) -> bool {
        !matches!(self, BoundaryState::Open)
    }
}

/// Identity token minted once per boundary invocation.
///
/// Two labels are the same only if they point at the same cell. Escapes
/// keep the cell alive, so an address can never be reused while anything
/// still refers to it.
#[derive(Clone)]
pub(crate) struct Label(Rc<Cell<BoundaryState>>);

impl Label {
    fn mint() -> Self {
        Self(Rc::new(Cell::new(BoundaryState::Open)))
    }

    pub(crate) fn state(&self) -> BoundaryState {
        self.0.get()
    }

    fn is(&self, other: &Label) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn close(&self, state: BoundaryState) {
        self.0.set(state);
    }

    /// Builds the escape that unwinds the body up to this label's boundary.
    ///
    /// Panics if the boundary already closed.
    pub(crate) fn abort<N: 'static>(&self, negative: N) -> Escape {
        assert!(
            !self.state().is_closed(),
            "extractor used after its boundary closed ({:?})",
            self
        );
        trace!("boundary {:?} - abort requested", self);
        Escape {
            label: self.clone(),
            negative: Box::new(negative),
        }
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({:p})", Rc::as_ptr(&self.0))
    }
}

/// Escape signal: a negative payload travelling back to the boundary
/// whose label it carries.
///
/// It does not implement `std::error::Error`, so a `?` on another
/// error type cannot absorb it.
///
/// The payload is stored as `dyn Any`, so only `'static` negatives can be
/// carried.
pub struct Escape {
    label: Label,
    negative: Box<dyn Any>,
}

impl Escape {
    /// Hands the payload back if this escape was minted by `label` for a
    /// payload of type `N`, otherwise returns the escape untouched.
    fn claim<N: 'static>(self, label: &Label) -> Result<N, Escape> {
        let Escape { label: owner, negative } = self;
        if !owner.is(label) {
            return Err(Escape {
                label: owner,
                negative,
            });
        }
        match negative.downcast::<N>() {
            Ok(negative) => Ok(*negative),
            Err(negative) => Err(Escape {
                label: owner,
                negative,
            }),
        }
    }

    /// State of the boundary this escape is addressed to.
    pub fn target_state(&self) -> BoundaryState {
        self.label.state()
    }

    /// Called when an escape reaches a top-level boundary that did not
    /// mint it. There is nothing left to unwind to, so this is always a
    /// programming error.
    pub(crate) fn unclaimed(self) -> ! {
        if self.target_state().is_closed() {
            panic!(
                "escape signal for {:?} outlived its boundary ({:?})",
                self.label,
                self.target_state()
            );
        }
        panic!(
            "escape signal for enclosing {:?} reached a top-level `direct`; \
             open nested boundaries with `scoped` and propagate with `?`",
            self.label
        );
    }
}

impl fmt::Debug for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Escape")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Outcome family that a boundary can produce.
pub(crate) trait Family: Sized {
    /// Positive payload.
    type Value;

    /// What an escape carries in place of the whole negative outcome.
    type Negative: 'static;

    fn positive(value: Self::Value) -> Self;

    fn negative(negative: Self::Negative) -> Self;
}

/// Opens a boundary, runs `body` with its label and resolves the result.
///
/// Escapes minted for this boundary become the family's negative outcome;
/// escapes minted for any other boundary are handed back as `Err` so the
/// enclosing body can keep propagating them.
pub(crate) fn run_scoped<O, F>(body: F) -> Scoped<O>
where
    O: Family,
    F: FnOnce(&Label) -> Scoped<O::Value>,
{
    let label = Label::mint();
    trace!("boundary {:?} - open", label);

    match body(&label) {
        Ok(value) => {
            label.close(BoundaryState::ClosedNormal);
            trace!("boundary {:?} - closed normally", label);
            Ok(O::positive(value))
        }
        Err(escape) => {
            label.close(BoundaryState::ClosedAborted);
            match escape.claim::<O::Negative>(&label) {
                Ok(negative) => {
                    trace!("boundary {:?} - aborted", label);
                    Ok(O::negative(negative))
                }
                Err(foreign) => {
                    trace!(
                        "boundary {:?} - forwarding escape for {:?}",
                        label,
                        foreign.label
                    );
                    Err(foreign)
                }
            }
        }
    }
}

/// Top-level counterpart of `run_scoped`.
pub(crate) fn run_direct<O, F>(body: F) -> O
where
    O: Family,
    F: FnOnce(&Label) -> Scoped<O::Value>,
{
    match run_scoped(body) {
        Ok(outcome) => outcome,
        Err(escape) => escape.unclaimed(),
    }
}
