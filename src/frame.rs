//! Timestamped planar audio buffers.

use crate::clock;

/// A discrete planar audio buffer with presentation timing.
///
/// `AudioFrame` is the unit of audio data passed through the splicer. Sample
/// bytes live in `planes` byte buffers that all cover the same
/// `sample_count` samples of `sample_width` bytes each.
///
/// `pts` and `duration` are attached separately from the buffer itself, the
/// way the host's clock layer stamps buffers after allocation; frames
/// missing either are rejected at the splicer's boundaries.
///
/// # Example
///
/// ```
/// use splice_audio::AudioFrame;
///
/// // 480 samples of stereo-planar s16 at pts 0, lasting 900 ticks (10ms)
/// let frame = AudioFrame::silence(2, 480, 2).with_pts(0).with_duration(900);
/// assert_eq!(frame.geometry(), Some((480, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    /// Presentation timestamp in ticks
    /// ([`TICKS_PER_SECOND`](crate::clock::TICKS_PER_SECOND)).
    pub pts: Option<u64>,
    /// Duration in ticks.
    pub duration: Option<u64>,
    /// Number of samples held by every plane.
    pub sample_count: usize,
    /// Bytes per sample.
    pub sample_width: usize,
    /// Channel-grouped byte buffers; each must hold at least
    /// `sample_count * sample_width` bytes.
    pub planes: Vec<Vec<u8>>,
}

impl AudioFrame {
    /// Creates an unstamped frame of zeroed samples.
    pub fn silence(planes: u8, sample_count: usize, sample_width: usize) -> Self {
        Self {
            pts: None,
            duration: None,
            sample_count,
            sample_width,
            planes: vec![vec![0u8; sample_count * sample_width]; usize::from(planes)],
        }
    }

    /// Creates an unstamped frame from pre-filled planes.
    pub fn from_planes(planes: Vec<Vec<u8>>, sample_count: usize, sample_width: usize) -> Self {
        Self {
            pts: None,
            duration: None,
            sample_count,
            sample_width,
            planes,
        }
    }

    /// Stamps the presentation timestamp.
    #[must_use]
    pub fn with_pts(mut self, pts: u64) -> Self {
        self.pts = Some(pts);
        self
    }

    /// Stamps the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Returns `(sample_count, sample_width)` when every plane holds enough
    /// bytes for them, `None` otherwise.
    ///
    /// A frame with no planes has no readable geometry.
    pub fn geometry(&self) -> Option<(usize, usize)> {
        let needed = self.sample_count.checked_mul(self.sample_width)?;
        if self.planes.is_empty() {
            return None;
        }
        if self.planes.iter().all(|plane| plane.len() >= needed) {
            Some((self.sample_count, self.sample_width))
        } else {
            None
        }
    }

    /// Discards the first `samples` samples from every plane and advances
    /// `pts` by the corresponding tick interval at `rate`.
    ///
    /// The duration attribute is left as stamped; only `pts` moves.
    pub(crate) fn trim_start(&mut self, samples: usize, rate: u64) {
        if samples == 0 {
            return;
        }
        let samples = samples.min(self.sample_count);
        let bytes = samples * self.sample_width;
        for plane in &mut self.planes {
            plane.drain(..bytes.min(plane.len()));
        }
        self.sample_count -= samples;
        if let Some(pts) = self.pts {
            self.pts = Some(pts + clock::samples_to_ticks(samples, rate));
        }
    }
}
