//! Controller and input identification types.
//!
//! Handles are the non-owning half of the ownership model: the controller
//! owns every source input, callers keep copyable handles that are
//! validated on every use.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier of a
/// [`ContinuityController`](crate::ContinuityController) instance.
///
/// Ids are process-wide unique, so a handle minted by one controller can
/// never address an input of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(u64);

impl ControllerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller#{}", self.0)
    }
}

/// Per-controller input slot id, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct InputId(pub(crate) u64);

/// Non-owning reference to one source input of one controller.
///
/// An `InputHandle` is cheap to copy and never keeps an input alive: every
/// operation that takes a handle validates it against the owning controller
/// first and fails with
/// [`ContinuityError::UnknownInput`](crate::ContinuityError::UnknownInput)
/// once the input has been removed.
///
/// # Example
///
/// ```
/// use splice_audio::ContinuityController;
///
/// let mut controller = ContinuityController::new();
/// let feed = controller.create_input();
///
/// assert_eq!(feed.parent(), controller.id());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputHandle {
    parent: ControllerId,
    id: InputId,
}

impl InputHandle {
    pub(crate) fn new(parent: ControllerId, id: InputId) -> Self {
        Self { parent, id }
    }

    /// Returns the id of the controller this input belongs to.
    pub fn parent(&self) -> ControllerId {
        self.parent
    }

    pub(crate) fn id(&self) -> InputId {
        self.id
    }
}

impl fmt::Display for InputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input#{}@{}", self.id.0, self.parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_ids_are_unique() {
        let a = ControllerId::next();
        let b = ControllerId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_handle_parent_round_trip() {
        let parent = ControllerId::next();
        let handle = InputHandle::new(parent, InputId(3));
        assert_eq!(handle.parent(), parent);
        assert_eq!(handle.id(), InputId(3));
    }

    #[test]
    fn test_handle_equality() {
        let parent = ControllerId::next();
        let a = InputHandle::new(parent, InputId(0));
        let b = InputHandle::new(parent, InputId(0));
        let c = InputHandle::new(parent, InputId(1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_handle_display() {
        let handle = InputHandle::new(ControllerId(7), InputId(2));
        assert_eq!(format!("{handle}"), "input#2@controller#7");
    }
}
