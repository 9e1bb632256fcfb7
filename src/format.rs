//! Flow definitions negotiated between the host pipeline and the splicer.

use crate::error::ContinuityError;

/// Definition-string prefix identifying audio flows.
pub const AUDIO_FLOW_PREFIX: &str = "audio.";

/// Description of one negotiated flow: a type tag plus the attributes the
/// splicer reads.
///
/// Mirrors the attribute bag the host's negotiation layer passes around:
/// `planes`, `rate` and `name` are attached individually and may be absent.
/// The splicer requires `planes` and `rate` on every flow it accepts; `name`
/// only matters on source flows, where it is matched against the pending
/// input selection.
///
/// # Example
///
/// ```
/// use splice_audio::FlowDef;
///
/// let flow = FlowDef::audio(2, 48_000).with_name("studio");
/// assert!(flow.is_audio());
/// assert_eq!(flow.planes(), Some(2));
/// assert_eq!(flow.name(), Some("studio"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDef {
    def: String,
    planes: Option<u8>,
    rate: Option<u64>,
    name: Option<String>,
}

impl FlowDef {
    /// Creates a flow definition with the given type tag and no attributes.
    pub fn new(def: impl Into<String>) -> Self {
        Self {
            def: def.into(),
            planes: None,
            rate: None,
            name: None,
        }
    }

    /// Creates a raw-audio flow definition with the given geometry.
    pub fn audio(planes: u8, rate: u64) -> Self {
        Self::new(AUDIO_FLOW_PREFIX).with_planes(planes).with_rate(rate)
    }

    /// Attaches the plane count.
    #[must_use]
    pub fn with_planes(mut self, planes: u8) -> Self {
        self.planes = Some(planes);
        self
    }

    /// Attaches the sample rate in Hz.
    #[must_use]
    pub fn with_rate(mut self, rate: u64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Attaches the flow name used for input selection.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the definition string.
    pub fn def(&self) -> &str {
        &self.def
    }

    /// Returns `true` if the definition string marks an audio flow.
    pub fn is_audio(&self) -> bool {
        self.def.starts_with(AUDIO_FLOW_PREFIX)
    }

    /// Returns the plane count, if attached.
    pub fn planes(&self) -> Option<u8> {
        self.planes
    }

    /// Returns the sample rate, if attached.
    pub fn rate(&self) -> Option<u64> {
        self.rate
    }

    /// Returns the flow name, if attached.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Validates this flow as audio and extracts `(planes, rate)`.
    ///
    /// # Errors
    ///
    /// [`ContinuityError::NotAudio`] when the type tag is not audio,
    /// [`ContinuityError::MissingAttribute`] when `planes` or `rate` is
    /// absent.
    pub fn audio_params(&self) -> Result<(u8, u64), ContinuityError> {
        if !self.is_audio() {
            return Err(ContinuityError::NotAudio {
                def: self.def.clone(),
            });
        }
        let planes = self.planes.ok_or(ContinuityError::MissingAttribute {
            attribute: "planes",
        })?;
        let rate = self
            .rate
            .ok_or(ContinuityError::MissingAttribute { attribute: "rate" })?;
        Ok((planes, rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_flow() {
        let flow = FlowDef::audio(2, 48_000);
        assert!(flow.is_audio());
        assert_eq!(flow.audio_params().unwrap(), (2, 48_000));
    }

    #[test]
    fn test_non_audio_rejected() {
        let flow = FlowDef::new("video.raw.").with_planes(1).with_rate(90_000);
        assert!(!flow.is_audio());
        assert!(matches!(
            flow.audio_params(),
            Err(ContinuityError::NotAudio { .. })
        ));
    }

    #[test]
    fn test_missing_planes_rejected() {
        let flow = FlowDef::new(AUDIO_FLOW_PREFIX).with_rate(48_000);
        assert!(matches!(
            flow.audio_params(),
            Err(ContinuityError::MissingAttribute {
                attribute: "planes"
            })
        ));
    }

    #[test]
    fn test_missing_rate_rejected() {
        let flow = FlowDef::new(AUDIO_FLOW_PREFIX).with_planes(2);
        assert!(matches!(
            flow.audio_params(),
            Err(ContinuityError::MissingAttribute { attribute: "rate" })
        ));
    }

    #[test]
    fn test_name_attribute() {
        let flow = FlowDef::audio(1, 44_100).with_name("cam1");
        assert_eq!(flow.name(), Some("cam1"));

        let unnamed = FlowDef::audio(1, 44_100);
        assert_eq!(unnamed.name(), None);
    }
}
