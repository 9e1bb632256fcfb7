//! The shared presentation clock domain.
//!
//! Feed frames and reference frames are stamped in the same tick domain so
//! that queues can be aligned against the reference stream by integer
//! arithmetic alone.

/// Ticks per second of the presentation clock.
///
/// 90 kHz, the conventional transport-stream timestamp rate.
pub const TICKS_PER_SECOND: u64 = 90_000;

/// Converts a tick interval to a whole number of samples at `rate`.
///
/// Truncates: a partially covered trailing sample is not counted.
#[must_use]
pub fn ticks_to_samples(ticks: u64, rate: u64) -> usize {
    if rate == 0 {
        return 0;
    }
    (ticks * rate / TICKS_PER_SECOND) as usize
}

/// Converts a sample count at `rate` to a tick interval.
///
/// Rounds up: a frame trimmed by this many samples must not start before the
/// window edge it was trimmed to.
#[must_use]
pub fn samples_to_ticks(samples: usize, rate: u64) -> u64 {
    if rate == 0 {
        return 0;
    }
    (samples as u64 * TICKS_PER_SECOND).div_ceil(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_to_samples_truncates() {
        // 100 ticks at 48kHz cover 53.33 samples
        assert_eq!(ticks_to_samples(100, 48_000), 53);
    }

    #[test]
    fn test_samples_to_ticks_rounds_up() {
        // 53 samples at 48kHz last 99.375 ticks
        assert_eq!(samples_to_ticks(53, 48_000), 100);
    }

    #[test]
    fn test_exact_conversion_round_trips() {
        // 800 samples at 48kHz are exactly 1500 ticks
        assert_eq!(samples_to_ticks(800, 48_000), 1500);
        assert_eq!(ticks_to_samples(1500, 48_000), 800);
    }

    #[test]
    fn test_zero_rate() {
        assert_eq!(ticks_to_samples(1000, 0), 0);
        assert_eq!(samples_to_ticks(1000, 0), 0);
    }

    #[test]
    fn test_zero_interval() {
        assert_eq!(ticks_to_samples(0, 48_000), 0);
        assert_eq!(samples_to_ticks(0, 48_000), 0);
    }
}
