//! A single candidate feed: its negotiated flow and pending frame queue.

use std::collections::VecDeque;

use crate::clock;
use crate::format::FlowDef;
use crate::frame::AudioFrame;

/// One candidate feed attached to a controller.
///
/// Owns the feed's negotiated flow definition and its queue of pending
/// frames. Exactly one producer appends, so the queue is in non-decreasing
/// pts order; pruning and compositing both rely on that.
#[derive(Debug, Default)]
pub(crate) struct SourceInput {
    pub(crate) flow_def: Option<FlowDef>,
    pub(crate) queue: VecDeque<AudioFrame>,
}

impl SourceInput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a frame to the queue tail.
    ///
    /// A frame without pts or duration cannot be aligned against the
    /// reference clock; it is discarded and the reject reason returned.
    pub(crate) fn enqueue(&mut self, frame: AudioFrame) -> Option<&'static str> {
        if frame.pts.is_none() {
            tracing::warn!("feed frame without pts");
            return Some("missing pts");
        }
        if frame.duration.is_none() {
            tracing::warn!("feed frame without duration");
            return Some("missing duration");
        }
        self.queue.push_back(frame);
        None
    }

    /// Name carried by the negotiated flow, if any.
    pub(crate) fn flow_name(&self) -> Option<&str> {
        self.flow_def.as_ref().and_then(FlowDef::name)
    }

    /// Drops or trims queued frames that fall before `window_start`.
    ///
    /// Scans from the head: frames ending before the window are discarded,
    /// a frame straddling the window edge is trimmed in place (possibly to
    /// zero samples) and becomes the new head, and the scan stops at the
    /// first frame starting after the window.
    pub(crate) fn prune_before(&mut self, window_start: u64, rate: u64) {
        while let Some(head) = self.queue.front_mut() {
            let (Some(pts), Some(duration)) = (head.pts, head.duration) else {
                // queued frames are validated on entry; drop anything else
                self.queue.pop_front();
                continue;
            };
            if pts + duration < window_start {
                // wholly in the past
                tracing::trace!(pts, window_start, "dropping stale feed frame");
                self.queue.pop_front();
                continue;
            }
            if pts > window_start {
                // wholly in the future
                break;
            }
            // straddles the window edge
            let drop_samples = clock::ticks_to_samples(window_start - pts, rate);
            if drop_samples > head.sample_count {
                self.queue.pop_front();
                continue;
            }
            head.trim_start(drop_samples, rate);
            break;
        }
    }

    pub(crate) fn queued(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u64 = 48_000;

    /// Creates a stamped single-plane frame whose bytes count up from 0.
    fn frame(pts: u64, duration: u64, samples: usize) -> AudioFrame {
        let plane: Vec<u8> = (0..samples * 2).map(|i| i as u8).collect();
        AudioFrame::from_planes(vec![plane], samples, 2)
            .with_pts(pts)
            .with_duration(duration)
    }

    #[test]
    fn test_enqueue_requires_pts() {
        let mut input = SourceInput::new();
        let unstamped = AudioFrame::silence(1, 100, 2).with_duration(50);
        assert_eq!(input.enqueue(unstamped), Some("missing pts"));
        assert_eq!(input.queued(), 0);
    }

    #[test]
    fn test_enqueue_requires_duration() {
        let mut input = SourceInput::new();
        let unstamped = AudioFrame::silence(1, 100, 2).with_pts(500);
        assert_eq!(input.enqueue(unstamped), Some("missing duration"));
        assert_eq!(input.queued(), 0);
    }

    #[test]
    fn test_enqueue_stamped_frame() {
        let mut input = SourceInput::new();
        assert_eq!(input.enqueue(frame(0, 900, 480)), None);
        assert_eq!(input.queued(), 1);
    }

    #[test]
    fn test_prune_drops_stale_frame() {
        let mut input = SourceInput::new();
        assert_eq!(input.enqueue(frame(500, 50, 32)), None);

        input.prune_before(1000, RATE);

        assert_eq!(input.queued(), 0);
    }

    #[test]
    fn test_prune_trims_straddling_frame() {
        // pts 900, window 1000: (1000-900) * 48000 / 90000 = 53 samples
        let mut input = SourceInput::new();
        let original = frame(900, 2000, 200);
        let original_plane = original.planes[0].clone();
        assert_eq!(input.enqueue(original), None);

        input.prune_before(1000, RATE);

        let head = input.queue.front().unwrap();
        assert_eq!(head.pts, Some(1000));
        assert_eq!(head.sample_count, 200 - 53);
        assert_eq!(head.planes[0].as_slice(), &original_plane[53 * 2..]);
    }

    #[test]
    fn test_prune_keeps_exact_boundary_frame_as_empty_head() {
        // 80 samples at 48kHz are exactly 150 ticks, so a frame at pts 0
        // straddling a window at 150 trims to zero samples but stays queued
        let mut input = SourceInput::new();
        assert_eq!(input.enqueue(frame(0, 900, 80)), None);

        input.prune_before(150, RATE);

        assert_eq!(input.queued(), 1);
        let head = input.queue.front().unwrap();
        assert_eq!(head.sample_count, 0);
        assert_eq!(head.pts, Some(150));
    }

    #[test]
    fn test_prune_discards_straddler_shorter_than_offset() {
        // frame claims to end past the window but only holds 10 samples
        let mut input = SourceInput::new();
        assert_eq!(input.enqueue(frame(900, 2000, 10)), None);

        input.prune_before(1000, RATE);

        assert_eq!(input.queued(), 0);
    }

    #[test]
    fn test_prune_stops_at_future_frame() {
        let mut input = SourceInput::new();
        assert_eq!(input.enqueue(frame(500, 50, 32)), None); // stale
        assert_eq!(input.enqueue(frame(2000, 900, 480)), None); // future

        input.prune_before(1000, RATE);

        assert_eq!(input.queued(), 1);
        assert_eq!(input.queue.front().unwrap().pts, Some(2000));
    }

    #[test]
    fn test_prune_stops_after_trimming_head() {
        let mut input = SourceInput::new();
        assert_eq!(input.enqueue(frame(900, 2000, 200)), None); // straddles
        assert_eq!(input.enqueue(frame(2900, 900, 480)), None); // untouched

        input.prune_before(1000, RATE);

        assert_eq!(input.queued(), 2);
        assert_eq!(input.queue[0].pts, Some(1000));
        assert_eq!(input.queue[1].sample_count, 480);
    }

    #[test]
    fn test_prune_empty_queue() {
        let mut input = SourceInput::new();
        input.prune_before(1000, RATE);
        assert_eq!(input.queued(), 0);
    }
}
