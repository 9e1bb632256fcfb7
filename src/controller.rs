//! The continuity controller: prunes feed queues against the reference
//! clock and splices the active feed into reference frames.

use std::collections::BTreeMap;

use crate::clock;
use crate::error::ContinuityError;
use crate::event::{event_callback, ContinuityEvent, EventCallback};
use crate::format::FlowDef;
use crate::frame::AudioFrame;
use crate::handle::{ControllerId, InputHandle, InputId};
use crate::input::SourceInput;

/// Default pts tolerance: 1ms of the reference clock.
pub const DEFAULT_TOLERANCE: u64 = clock::TICKS_PER_SECOND / 1_000;

/// Splices one of several candidate feeds into a reference audio stream.
///
/// The reference stream clocks and shapes the output: every reference frame
/// is returned with the same timing and geometry it arrived with, carrying
/// either the active feed's samples or, when no feed is active or the feed
/// underruns, whatever the reference buffer already held.
///
/// Feeds are addressed by [`InputHandle`] and selected by the name on their
/// flow definition. Selection is sticky: naming a feed that has not attached
/// yet (or has died) takes effect the moment a matching flow definition
/// arrives.
///
/// # Example
///
/// ```
/// use splice_audio::{AudioFrame, ContinuityController, FlowDef};
///
/// let mut controller = ContinuityController::new();
/// controller.set_output_flow_def(FlowDef::audio(1, 48_000))?;
///
/// let feed = controller.create_input();
/// controller.set_input_selection(Some("studio"));
/// controller.attach_flow_def(feed, FlowDef::audio(1, 48_000).with_name("studio"))?;
/// assert_eq!(controller.current_input_name().as_deref(), Some("studio"));
///
/// // 480 samples at 48kHz are 900 ticks of the 90kHz reference clock
/// let reference = AudioFrame::silence(1, 480, 2).with_pts(0).with_duration(900);
/// let out = controller.process_reference_frame(reference);
/// assert!(out.is_some());
/// # Ok::<(), splice_audio::ContinuityError>(())
/// ```
pub struct ContinuityController {
    id: ControllerId,
    /// Output flow definition, once negotiated.
    flow_def: Option<FlowDef>,
    /// Cached plane count of the output flow.
    planes: u8,
    /// Cached sample rate of the output flow.
    samplerate: u64,
    /// Candidate feeds, keyed in creation order.
    inputs: BTreeMap<InputId, SourceInput>,
    next_input: u64,
    /// Currently active feed; always a live key of `inputs`.
    active: Option<InputId>,
    /// Requested feed name; survives the death of the feed it names.
    desired_name: Option<String>,
    /// Synchronization slack in ticks. Stored for the surrounding pipeline;
    /// not consumed by pruning or compositing.
    tolerance: u64,
    event_callback: Option<EventCallback>,
}

impl ContinuityController {
    /// Creates a controller with the default tolerance.
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Creates a controller with the given pts tolerance in ticks.
    pub fn with_tolerance(tolerance: u64) -> Self {
        Self {
            id: ControllerId::next(),
            flow_def: None,
            planes: 0,
            samplerate: 0,
            inputs: BTreeMap::new(),
            next_input: 0,
            active: None,
            desired_name: None,
            tolerance,
            event_callback: None,
        }
    }

    /// Sets a callback to receive runtime events.
    ///
    /// Events include input switches, feed removal and underrun warnings.
    #[must_use]
    pub fn on_event<F>(self, callback: F) -> Self
    where
        F: Fn(ContinuityEvent) + Send + Sync + 'static,
    {
        self.with_event_callback(event_callback(callback))
    }

    /// Sets the event callback from an already shared [`EventCallback`].
    #[must_use]
    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    /// Returns this controller's unique id.
    pub fn id(&self) -> ControllerId {
        self.id
    }

    fn emit_event(&self, event: ContinuityEvent) {
        if let Some(callback) = &self.event_callback {
            callback(event);
        }
    }

    /// Negotiates the output flow.
    ///
    /// # Errors
    ///
    /// Rejects definitions that are not audio or lack `planes`/`rate`; the
    /// previous output flow stays in effect.
    pub fn set_output_flow_def(&mut self, flow: FlowDef) -> Result<(), ContinuityError> {
        let (planes, rate) = flow.audio_params()?;
        self.flow_def = Some(flow);
        self.planes = planes;
        self.samplerate = rate;
        Ok(())
    }

    /// Returns the negotiated output flow definition.
    pub fn output_flow_def(&self) -> Option<&FlowDef> {
        self.flow_def.as_ref()
    }

    /// Creates a new candidate feed and returns its handle.
    pub fn create_input(&mut self) -> InputHandle {
        let id = InputId(self.next_input);
        self.next_input += 1;
        self.inputs.insert(id, SourceInput::new());
        tracing::debug!(input = self.next_input - 1, "created input");
        InputHandle::new(self.id, id)
    }

    /// Iterates the live inputs in creation order.
    pub fn inputs(&self) -> impl Iterator<Item = InputHandle> + '_ {
        self.inputs.keys().map(|&id| InputHandle::new(self.id, id))
    }

    /// Number of live inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Removes a feed, discarding its queued frames.
    ///
    /// If the feed was active, the output falls back to pass-through; the
    /// pending selection name is kept so a feed reattaching under it becomes
    /// active again.
    ///
    /// # Errors
    ///
    /// [`ContinuityError::UnknownInput`] if the handle is stale or foreign.
    pub fn remove_input(&mut self, handle: InputHandle) -> Result<(), ContinuityError> {
        if handle.parent() != self.id {
            return Err(ContinuityError::UnknownInput);
        }
        let input = self
            .inputs
            .remove(&handle.id())
            .ok_or(ContinuityError::UnknownInput)?;
        if self.active == Some(handle.id()) {
            self.active = None;
            let name = input.flow_name().map(str::to_owned);
            tracing::debug!(input = %handle, "active input removed");
            self.emit_event(ContinuityEvent::ActiveInputRemoved { name });
        }
        Ok(())
    }

    /// Attaches a feed's negotiated flow definition.
    ///
    /// If the pending selection names this flow, the feed becomes active
    /// immediately - feeds typically attach after selection was requested.
    ///
    /// # Errors
    ///
    /// Rejects definitions that are not audio, lack `planes`/`rate`, or
    /// disagree with a negotiated output flow. Fails with
    /// [`ContinuityError::UnknownInput`] on a stale or foreign handle.
    pub fn attach_flow_def(
        &mut self,
        handle: InputHandle,
        flow: FlowDef,
    ) -> Result<(), ContinuityError> {
        if handle.parent() != self.id {
            return Err(ContinuityError::UnknownInput);
        }
        let Some(input) = self.inputs.get_mut(&handle.id()) else {
            return Err(ContinuityError::UnknownInput);
        };
        let (planes, rate) = flow.audio_params()?;
        if self.flow_def.is_some() && (planes != self.planes || rate != self.samplerate) {
            return Err(ContinuityError::FormatMismatch {
                want_planes: self.planes,
                want_rate: self.samplerate,
                got_planes: planes,
                got_rate: rate,
            });
        }
        let switch_to = match (self.desired_name.as_deref(), flow.name()) {
            (Some(want), Some(got)) if want == got => Some(got.to_owned()),
            _ => None,
        };
        input.flow_def = Some(flow);
        if let Some(name) = switch_to {
            self.active = Some(handle.id());
            tracing::info!(input = %name, "switched to input");
            self.emit_event(ContinuityEvent::InputSwitched { name });
        }
        Ok(())
    }

    /// Queues a feed frame for splicing.
    ///
    /// Frames without pts or duration are discarded with a warning; that is
    /// not an error, the stream continues.
    ///
    /// # Errors
    ///
    /// [`ContinuityError::UnknownInput`] if the handle is stale or foreign.
    pub fn enqueue(
        &mut self,
        handle: InputHandle,
        frame: AudioFrame,
    ) -> Result<(), ContinuityError> {
        if handle.parent() != self.id {
            return Err(ContinuityError::UnknownInput);
        }
        let Some(input) = self.inputs.get_mut(&handle.id()) else {
            return Err(ContinuityError::UnknownInput);
        };
        if let Some(reason) = input.enqueue(frame) {
            self.emit_event(ContinuityEvent::FrameRejected { reason });
        }
        Ok(())
    }

    /// Number of frames queued on a feed, or `None` for a dead handle.
    pub fn queued_frames(&self, handle: InputHandle) -> Option<usize> {
        if handle.parent() != self.id {
            return None;
        }
        self.inputs.get(&handle.id()).map(SourceInput::queued)
    }

    /// Requests the feed to splice from, by flow name.
    ///
    /// Scans the live inputs for a matching flow and switches immediately on
    /// a hit; otherwise the current active feed (if any) keeps playing until
    /// a feed attaches a flow definition carrying the requested name.
    /// `None` clears the request without touching the active feed.
    pub fn set_input_selection(&mut self, name: Option<&str>) {
        if let Some(name) = name {
            let found = self
                .inputs
                .iter()
                .find_map(|(&id, input)| (input.flow_name() == Some(name)).then_some(id));
            if let Some(id) = found {
                self.active = Some(id);
                tracing::info!(input = %name, "switched to input");
                self.emit_event(ContinuityEvent::InputSwitched {
                    name: name.to_owned(),
                });
            }
        }
        self.desired_name = name.map(str::to_owned);
    }

    /// Returns the pending selection name.
    pub fn selection_name(&self) -> Option<&str> {
        self.desired_name.as_deref()
    }

    /// Returns the flow name of the feed currently being spliced.
    ///
    /// `None` when no feed is active or the active feed's flow is unnamed.
    pub fn current_input_name(&self) -> Option<String> {
        let id = self.active?;
        self.inputs.get(&id)?.flow_name().map(str::to_owned)
    }

    /// Sets the pts tolerance in ticks.
    pub fn set_tolerance(&mut self, tolerance: u64) {
        self.tolerance = tolerance;
    }

    /// Returns the pts tolerance in ticks.
    pub fn tolerance(&self) -> u64 {
        self.tolerance
    }

    /// Processes one reference frame and returns it for emission.
    ///
    /// Prunes every feed queue against the frame's timestamp window, then
    /// splices the active feed's samples into the frame. With no active feed
    /// (or on underrun) the frame's existing content passes through.
    ///
    /// Returns `None` when the frame was discarded: output flow not yet
    /// negotiated, missing pts/duration, unreadable geometry, or fewer
    /// planes than the output flow requires.
    pub fn process_reference_frame(&mut self, mut frame: AudioFrame) -> Option<AudioFrame> {
        if self.flow_def.is_none() {
            tracing::warn!("reference frame before output flow definition");
            self.emit_event(ContinuityEvent::FrameRejected {
                reason: "output flow not negotiated",
            });
            return None;
        }
        let Some(window_start) = frame.pts else {
            tracing::warn!("reference frame without pts");
            self.emit_event(ContinuityEvent::FrameRejected {
                reason: "missing pts",
            });
            return None;
        };
        if frame.duration.is_none() {
            tracing::warn!("reference frame without duration");
            self.emit_event(ContinuityEvent::FrameRejected {
                reason: "missing duration",
            });
            return None;
        }
        let Some((ref_samples, ref_width)) = frame.geometry() else {
            tracing::warn!("reference frame with unreadable geometry");
            self.emit_event(ContinuityEvent::FrameRejected {
                reason: "unreadable geometry",
            });
            return None;
        };

        for input in self.inputs.values_mut() {
            input.prune_before(window_start, self.samplerate);
        }

        let Some(input) = self.active.and_then(|id| self.inputs.get_mut(&id)) else {
            // no active feed: reference content passes through untouched
            return Some(frame);
        };

        let planes = usize::from(self.planes);
        if frame.planes.len() < planes {
            tracing::warn!(
                have = frame.planes.len(),
                want = planes,
                "could not map reference frame planes"
            );
            self.emit_event(ContinuityEvent::FrameRejected {
                reason: "plane count below output flow",
            });
            return None;
        }

        let mut offset = 0usize;
        while offset < ref_samples {
            let Some(head) = input.queue.front_mut() else {
                break;
            };
            let head_samples = head.sample_count;
            let extracted = (ref_samples - offset).min(head_samples);
            let byte_len = extracted * ref_width;

            if head.planes.len() < planes
                || head.planes.iter().take(planes).any(|p| p.len() < byte_len)
            {
                tracing::warn!("queued feed frame shorter than its sample count");
                input.queue.pop_front();
                break;
            }

            let dst_start = offset * ref_width;
            for (dst, src) in frame.planes.iter_mut().zip(head.planes.iter()).take(planes) {
                dst[dst_start..dst_start + byte_len].copy_from_slice(&src[..byte_len]);
            }

            offset += extracted;
            if extracted == head_samples {
                input.queue.pop_front();
            } else {
                head.trim_start(extracted, self.samplerate);
            }
        }

        if offset < ref_samples {
            let missing_samples = ref_samples - offset;
            tracing::debug!(missing_samples, "feed underrun, passing reference through");
            self.emit_event(ContinuityEvent::Underrun { missing_samples });
        }

        Some(frame)
    }
}

impl Default for ContinuityController {
    fn default() -> Self {
        Self::new()
    }
}
