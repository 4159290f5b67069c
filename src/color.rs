// ── Colors ────────────────────────────────────────────────────────────────────
//
// The color picker speaks COLORREF (0x00BBGGRR) and knows nothing about
// alpha; callers get an RGBA value back with alpha forced to opaque.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    u8::MAX
}

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl Color {
    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: u8::MAX }
    }

    /// Pack into a COLORREF; alpha is dropped.
    pub const fn to_colorref(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }

    /// Unpack a COLORREF; the result is always opaque.
    pub const fn from_colorref(value: u32) -> Self {
        Self::rgb(
            (value & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            ((value >> 16) & 0xFF) as u8,
        )
    }
}

/// Number of custom-color slots in the color picker.
pub const CUSTOM_COLOR_SLOTS: usize = 16;

/// The color picker's custom-color palette, as COLORREF values.
///
/// Owned by the caller and passed to every pick; the dialog reads and
/// updates it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomColors(pub [u32; CUSTOM_COLOR_SLOTS]);

impl CustomColors {
    /// The slots as colors.
    pub fn colors(&self) -> [Color; CUSTOM_COLOR_SLOTS] {
        self.0.map(Color::from_colorref)
    }
}
