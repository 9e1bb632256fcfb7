//! Runtime events for monitoring splice behavior.
//!
//! Events are non-fatal notifications about what the splicer did with the
//! data it was handed. Splicing keeps running after an event fires - they
//! exist for logging and metrics, not error handling.

use std::sync::Arc;

/// Runtime events emitted while splicing.
///
/// These are informational events, not errors. Use the [`EventCallback`] to
/// log them or update metrics.
///
/// # Example
///
/// ```
/// use splice_audio::ContinuityEvent;
///
/// fn handle_event(event: ContinuityEvent) {
///     match event {
///         ContinuityEvent::InputSwitched { name } => {
///             eprintln!("now splicing from '{name}'");
///         }
///         ContinuityEvent::ActiveInputRemoved { name } => {
///             eprintln!("active input {name:?} detached, passing through");
///         }
///         ContinuityEvent::Underrun { missing_samples } => {
///             eprintln!("underrun: {missing_samples} samples passed through");
///         }
///         ContinuityEvent::FrameRejected { reason } => {
///             eprintln!("frame discarded: {reason}");
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub enum ContinuityEvent {
    /// The controller switched to a new active input.
    ///
    /// Raised both by an explicit selection matching a live input and by a
    /// feed attaching a flow definition whose name matches the pending
    /// selection.
    InputSwitched {
        /// Flow name of the input now being spliced.
        name: String,
    },

    /// The active input was removed; output falls back to pass-through.
    ///
    /// The pending selection is kept, so a feed reattaching under the same
    /// name becomes active again without another selection call.
    ActiveInputRemoved {
        /// Flow name the removed input carried, if it had one.
        name: Option<String>,
    },

    /// The active input ran out of queued audio before the reference frame
    /// was filled.
    ///
    /// The unfilled remainder of the reference frame is passed through
    /// unchanged. Frequent underruns indicate the feed produces slower than
    /// the reference clock.
    Underrun {
        /// Samples of the reference frame left untouched.
        missing_samples: usize,
    },

    /// An incoming frame was discarded before reaching a queue or the
    /// output.
    FrameRejected {
        /// Why the frame was discarded.
        reason: &'static str,
    },
}

/// Callback type for receiving runtime events.
///
/// Register via
/// [`ContinuityController::on_event`](crate::ContinuityController::on_event)
/// or, when the callback is already shared,
/// [`ContinuityController::with_event_callback`](crate::ContinuityController::with_event_callback).
pub type EventCallback = Arc<dyn Fn(ContinuityEvent) + Send + Sync>;

/// Creates an [`EventCallback`] from a closure.
///
/// # Example
///
/// ```
/// use splice_audio::{event_callback, ContinuityEvent};
///
/// let callback = event_callback(|event| {
///     println!("splice event: {event:?}");
/// });
/// ```
pub fn event_callback<F>(f: F) -> EventCallback
where
    F: Fn(ContinuityEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_debug() {
        let event = ContinuityEvent::Underrun {
            missing_samples: 480,
        };
        let debug = format!("{event:?}");
        assert!(debug.contains("Underrun"));
        assert!(debug.contains("480"));
    }

    #[test]
    fn test_event_clone() {
        let event = ContinuityEvent::InputSwitched {
            name: "cam1".to_string(),
        };
        let cloned = event.clone();
        if let ContinuityEvent::InputSwitched { name } = cloned {
            assert_eq!(name, "cam1");
        } else {
            panic!("Expected InputSwitched variant");
        }
    }

    #[test]
    fn test_event_callback_helper() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();

        let callback = event_callback(move |_| {
            called_clone.store(true, Ordering::SeqCst);
        });

        callback(ContinuityEvent::FrameRejected { reason: "test" });
        assert!(called.load(Ordering::SeqCst));
    }
}
