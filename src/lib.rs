//! # splice-audio
//!
//! Sample-accurate audio feed switching against a reference clock.
//!
//! `splice-audio` implements a continuity node for streaming pipelines: a
//! continuous reference stream keeps the output clocked and shaped while
//! samples from one of several named candidate feeds are spliced into it.
//! Feed switches, late frames and underruns never interrupt the output -
//! whatever the reference buffer already carried (typically silence) passes
//! through instead.
//!
//! ## Quick Start
//!
//! ```rust
//! use splice_audio::{AudioFrame, ContinuityController, FlowDef};
//!
//! let mut controller = ContinuityController::new();
//! controller.set_output_flow_def(FlowDef::audio(2, 48_000))?;
//!
//! // Feeds attach asynchronously; selecting by name first is fine, the
//! // matching feed becomes active the moment its flow definition arrives.
//! controller.set_input_selection(Some("studio"));
//!
//! let feed = controller.create_input();
//! controller.attach_flow_def(feed, FlowDef::audio(2, 48_000).with_name("studio"))?;
//!
//! // The host delivers feed audio per input and reference audio to the
//! // controller; each reference frame comes back ready for emission.
//! let audio = AudioFrame::silence(2, 480, 2).with_pts(0).with_duration(900);
//! controller.enqueue(feed, audio)?;
//!
//! let reference = AudioFrame::silence(2, 480, 2).with_pts(0).with_duration(900);
//! let spliced = controller.process_reference_frame(reference);
//! assert!(spliced.is_some());
//! # Ok::<(), splice_audio::ContinuityError>(())
//! ```
//!
//! ## Architecture
//!
//! The controller is driven synchronously by the host pipeline:
//!
//! - **Feed side**: each candidate feed gets a [`ContinuityController::create_input`]
//!   handle, attaches a named flow definition and enqueues timestamped frames.
//! - **Reference side**: every reference frame prunes all feed queues against
//!   its timestamp window, then the active feed's samples are copied
//!   plane-by-plane into the reference buffer.
//! - **Selection**: feeds are chosen by flow name; the selection survives feed
//!   death and re-applies on reattach.
//!
//! There is no internal locking: one logical thread drives a controller
//! instance, matching the host pipeline's per-node scheduling.

#![warn(missing_docs)]

pub mod clock;
mod controller;
mod error;
mod event;
mod format;
mod frame;
mod handle;
mod input;

pub use controller::{ContinuityController, DEFAULT_TOLERANCE};
pub use error::ContinuityError;
pub use event::{event_callback, ContinuityEvent, EventCallback};
pub use format::{FlowDef, AUDIO_FLOW_PREFIX};
pub use frame::AudioFrame;
pub use handle::{ControllerId, InputHandle};
