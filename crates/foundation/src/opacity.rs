use serde::{Deserialize, Deserializer, Serialize};

/// Layer opacity, always within `[0, 1]`.
///
/// Construction clamps rather than rejects; NaN has no meaningful clamp and
/// is the only input refused.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Opacity(f32);

impl Opacity {
    pub const TRANSPARENT: Opacity = Opacity(0.0);
    pub const OPAQUE: Opacity = Opacity(1.0);

    /// Clamps `value` into `[0, 1]`. Returns `None` for NaN.
    pub fn clamped(value: f32) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        Some(Opacity(value.clamp(0.0, 1.0)))
    }

    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Opacity::OPAQUE
    }
}

impl<'de> Deserialize<'de> for Opacity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f32::deserialize(deserializer)?;
        Opacity::clamped(raw).ok_or_else(|| serde::de::Error::custom("opacity must be a number"))
    }
}
