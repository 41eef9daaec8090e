use palette::{FromColor, Hsl, IntoColor, Lab, Srgb};

/// Opaque sRGB color shared by the extractor, the swatch mapper and the UI.
///
/// Convertible to and from a packed `0xRRGGBB` integer, which is how swatch
/// colors are exchanged at the mapping boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    pub const fn from_packed(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// Pack into `0xRRGGBB`.
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    fn to_srgb_f32(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format()
    }

    /// Convert to CIELAB (for K-means clustering and deduplication).
    pub fn to_lab(self) -> Lab {
        self.to_srgb_f32().into_color()
    }

    /// Create from CIELAB.
    pub fn from_lab(lab: Lab) -> Self {
        let srgb_f32: Srgb<f32> = Srgb::from_color(lab);
        Self::from_srgb_f32_clamped(srgb_f32)
    }

    /// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let hsl: Hsl = self.to_srgb_f32().into_color();
        (
            hsl.hue.into_positive_degrees(),
            hsl.saturation,
            hsl.lightness,
        )
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// Paint `fg` at `alpha` (0 = transparent, 255 = opaque) over `bg`.
    pub fn composite(fg: Color, alpha: u8, bg: Color) -> Color {
        let a = alpha as u32;
        let mix = |f: u8, b: u8| ((f as u32 * a + b as u32 * (255 - a) + 127) / 255) as u8;
        Color {
            r: mix(fg.r, bg.r),
            g: mix(fg.g, bg.g),
            b: mix(fg.b, bg.b),
        }
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG 2.0 contrast ratio between two colors.
    ///
    /// Returns a value in [1, 21]. Higher means more contrast.
    pub fn contrast_ratio(c1: &Color, c2: &Color) -> f32 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
