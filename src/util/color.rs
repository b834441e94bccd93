//! Packed `0xRRGGBB` colors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A 24-bit RGB color stored as `0xRRGGBB`.
///
/// Serializes as a plain integer so TOML presets can write `0xff0000`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self(0x00ff_ffff);

    /// The packed `0xRRGGBB` value.
    #[must_use]
    pub fn hex(self) -> u32 {
        self.0 & 0x00ff_ffff
    }

    /// Linear `[r, g, b]` in `0.0..=1.0`.
    #[must_use]
    pub fn to_rgb(self) -> [f32; 3] {
        let v = self.hex();
        [
            ((v >> 16) & 0xff) as f32 / 255.0,
            ((v >> 8) & 0xff) as f32 / 255.0,
            (v & 0xff) as f32 / 255.0,
        ]
    }

    /// CSS hex notation, e.g. `#00aa55`.
    #[must_use]
    pub fn css(self) -> String {
        format!("#{:06x}", self.hex())
    }

    /// Short lowercase hex used inside pool keys, e.g. `aa55`.
    #[must_use]
    pub fn key(self) -> String {
        format!("{:x}", self.hex())
    }
}

impl From<u32> for Color {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_components() {
        assert_eq!(Color(0xff0000).to_rgb(), [1.0, 0.0, 0.0]);
        assert_eq!(Color(0x0000ff).to_rgb(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn css_is_zero_padded() {
        assert_eq!(Color(0x00aa55).css(), "#00aa55");
        assert_eq!(Color(0x00aa55).key(), "aa55");
    }
}
