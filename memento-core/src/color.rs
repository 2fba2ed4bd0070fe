//! # Seed colors
//! A text overlay stores a single *seed* color from which the host derives a
//! full foreground/background pair. The seed is a packed ARGB value in the
//! low 32 bits of a `u64`, matching the persisted representation.

/// Packed ARGB seed color. Alpha in the highest of the low four bytes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SeedColor(pub u64);

impl SeedColor {
    pub const WHITE: Self = Self::from_argb(0xFF, 0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::from_argb(0xFF, 0, 0, 0);
    /// The rainbow palette offered while a text overlay is focused.
    pub const PALETTE: [Self; 7] = [
        Self::from_argb(0xFF, 0xFF, 0x00, 0x00),
        Self::from_argb(0xFF, 0xFF, 0xA5, 0x00),
        Self::from_argb(0xFF, 0xFF, 0xFF, 0x00),
        Self::from_argb(0xFF, 0x00, 0x80, 0x00),
        Self::from_argb(0xFF, 0x00, 0x00, 0xFF),
        Self::from_argb(0xFF, 0x4B, 0x00, 0x82),
        Self::from_argb(0xFF, 0xEE, 0x82, 0xEE),
    ];

    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(
            ((a as u64) << 24) | ((r as u64) << 16) | ((g as u64) << 8) | (b as u64),
        )
    }
    #[must_use]
    pub const fn alpha(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }
    #[must_use]
    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }
    #[must_use]
    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }
    #[must_use]
    pub const fn blue(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
    /// Approximate relative luminance of the seed, 0 dark to 1 light.
    #[must_use]
    pub fn luminance(self) -> f32 {
        let channel = |v: u8| f32::from(v) / 255.0;
        0.2126 * channel(self.red()) + 0.7152 * channel(self.green()) + 0.0722 * channel(self.blue())
    }
    /// Black or white, whichever reads against this seed as a background.
    /// The full scheme derivation stays host-side.
    #[must_use]
    pub fn foreground(self) -> Self {
        if self.luminance() > 0.5 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

impl std::fmt::Debug for SeedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeedColor(#{:08X})", self.0 & 0xFFFF_FFFF)
    }
}

#[cfg(test)]
mod test {
    use super::SeedColor;

    #[test]
    fn pack_unpack() {
        let c = SeedColor::from_argb(0xFF, 0x12, 0x34, 0x56);
        assert_eq!(c.alpha(), 0xFF);
        assert_eq!(c.red(), 0x12);
        assert_eq!(c.green(), 0x34);
        assert_eq!(c.blue(), 0x56);
        assert_eq!(c, SeedColor(0xFF12_3456));
    }
    #[test]
    fn readable_foreground() {
        assert_eq!(SeedColor::WHITE.foreground(), SeedColor::BLACK);
        assert_eq!(SeedColor::BLACK.foreground(), SeedColor::WHITE);
        // Opaque blue is dark.
        assert_eq!(SeedColor(0xFF00_00FF).foreground(), SeedColor::WHITE);
    }
}
