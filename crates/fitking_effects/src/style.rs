//! Neon styling for the FitnessKing site.
//!
//! Dark surfaces, green and blue neon accents. Every enumerated option a
//! caller can pick (glow colour, intensity tier, text colour) maps to its
//! presentation parameters through an exhaustive `match`, so adding a
//! variant without a table entry fails to compile.

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Hue/saturation/lightness color, the form the brand palette is defined in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    /// Hue in degrees (0-360).
    pub h: f32,
    /// Saturation (0-1).
    pub s: f32,
    /// Lightness (0-1).
    pub l: f32,
    /// Alpha (0-1).
    pub a: f32,
}

impl Hsla {
    /// Creates an HSLA color.
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Returns the same hue at a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.h, self.s, self.l, a)
    }

    /// Converts to RGBA.
    #[must_use]
    pub fn to_rgba(self) -> Color {
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.h.rem_euclid(360.0) / 60.0;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());

        let (r, g, b) = match h {
            h if h < 1.0 => (chroma, x, 0.0),
            h if h < 2.0 => (x, chroma, 0.0),
            h if h < 3.0 => (0.0, chroma, x),
            h if h < 4.0 => (0.0, x, chroma),
            h if h < 5.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma * 0.5;
        Color::rgba(r + m, g + m, b + m, self.a)
    }
}

impl From<Hsla> for Color {
    fn from(value: Hsla) -> Self {
        value.to_rgba()
    }
}

/// Brand palette.
pub mod palette {
    use super::Hsla;

    /// Neon green.
    pub const PRIMARY: Hsla = Hsla::new(145.0, 0.80, 0.45, 1.0);
    /// Electric blue.
    pub const SECONDARY: Hsla = Hsla::new(200.0, 0.90, 0.50, 1.0);
    /// Teal, halfway between primary and secondary.
    pub const MIXED: Hsla = Hsla::new(170.0, 0.85, 0.47, 1.0);
}

/// Colour family of a glow card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum GlowColor {
    /// Neon green.
    #[default]
    Primary,
    /// Electric blue.
    Secondary,
    /// Teal.
    Mixed,
}

impl GlowColor {
    /// Base hue of this family at full alpha.
    #[must_use]
    pub const fn hue(self) -> Hsla {
        match self {
            Self::Primary => palette::PRIMARY,
            Self::Secondary => palette::SECONDARY,
            Self::Mixed => palette::MIXED,
        }
    }
}

/// Presentation parameters of an intensity tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowParams {
    /// Peak alpha of the radial light.
    pub opacity: f32,
    /// Blur radius in pixels.
    pub blur: f32,
    /// Light diameter in pixels.
    pub size: f32,
}

/// Strength of a glow effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum Intensity {
    /// Faint glow.
    Subtle,
    /// Default glow.
    #[default]
    Medium,
    /// Bright glow.
    Strong,
}

impl Intensity {
    /// All tiers, weakest first.
    pub const ALL: [Self; 3] = [Self::Subtle, Self::Medium, Self::Strong];

    /// Fixed parameters for this tier. Tiers are strictly ordered on every
    /// field.
    #[must_use]
    pub const fn params(self) -> GlowParams {
        match self {
            Self::Subtle => GlowParams {
                opacity: 0.15,
                blur: 60.0,
                size: 150.0,
            },
            Self::Medium => GlowParams {
                opacity: 0.25,
                blur: 80.0,
                size: 200.0,
            },
            Self::Strong => GlowParams {
                opacity: 0.35,
                blur: 100.0,
                size: 250.0,
            },
        }
    }
}

/// One layer of a text or box shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Blur radius in pixels.
    pub blur: f32,
    /// Spread in pixels (box shadows only; zero for text).
    pub spread: f32,
    /// Shadow color.
    pub color: Color,
}

impl Shadow {
    /// Text-style shadow: no spread.
    #[must_use]
    pub fn glow(blur: f32, color: Hsla) -> Self {
        Self {
            blur,
            spread: 0.0,
            color: color.to_rgba(),
        }
    }

    /// Box-style shadow with spread.
    #[must_use]
    pub fn spread(blur: f32, spread: f32, color: Hsla) -> Self {
        Self {
            blur,
            spread,
            color: color.to_rgba(),
        }
    }

    /// Interpolates blur, spread and color.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            blur: self.blur + (other.blur - self.blur) * t,
            spread: self.spread + (other.spread - self.spread) * t,
            color: self.color.lerp(other.color, t),
        }
    }
}

/// Number of layers in a neon text shadow.
pub const SHADOW_LAYERS: usize = 4;

/// Colour family of neon text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum TextColor {
    /// Neon green.
    Primary,
    /// Electric blue.
    Secondary,
    /// Green fading into blue.
    #[default]
    Gradient,
}

impl TextColor {
    /// Resting shadow: increasing blur, decreasing alpha.
    #[must_use]
    pub fn resting_shadow(self) -> [Shadow; SHADOW_LAYERS] {
        use palette::{MIXED, PRIMARY, SECONDARY};

        match self {
            Self::Primary => [
                Shadow::glow(5.0, PRIMARY.with_alpha(0.5)),
                Shadow::glow(10.0, PRIMARY.with_alpha(0.4)),
                Shadow::glow(20.0, PRIMARY.with_alpha(0.3)),
                Shadow::glow(40.0, PRIMARY.with_alpha(0.2)),
            ],
            Self::Secondary => [
                Shadow::glow(5.0, SECONDARY.with_alpha(0.5)),
                Shadow::glow(10.0, SECONDARY.with_alpha(0.4)),
                Shadow::glow(20.0, SECONDARY.with_alpha(0.3)),
                Shadow::glow(40.0, SECONDARY.with_alpha(0.2)),
            ],
            Self::Gradient => [
                Shadow::glow(5.0, PRIMARY.with_alpha(0.4)),
                Shadow::glow(10.0, MIXED.with_alpha(0.3)),
                Shadow::glow(20.0, SECONDARY.with_alpha(0.2)),
                Shadow::glow(40.0, SECONDARY.with_alpha(0.1)),
            ],
        }
    }

    /// Hover shadow, shared by every colour family.
    #[must_use]
    pub fn hover_shadow(self) -> [Shadow; SHADOW_LAYERS] {
        use palette::{PRIMARY, SECONDARY};

        [
            Shadow::glow(10.0, PRIMARY.with_alpha(0.7)),
            Shadow::glow(20.0, PRIMARY.with_alpha(0.5)),
            Shadow::glow(30.0, SECONDARY.with_alpha(0.4)),
            Shadow::glow(50.0, SECONDARY.with_alpha(0.3)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp() {
        let black = Color::rgba(0.0, 0.0, 0.0, 1.0);
        let mid = black.lerp(Color::WHITE, 0.5);

        assert!((mid.r - 0.5).abs() < 0.01);
        assert!((mid.g - 0.5).abs() < 0.01);
        assert!((mid.b - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_hsla_primaries() {
        let red = Hsla::new(0.0, 1.0, 0.5, 1.0).to_rgba();
        assert!((red.r - 1.0).abs() < 1e-5 && red.g.abs() < 1e-5 && red.b.abs() < 1e-5);

        let blue = Hsla::new(240.0, 1.0, 0.5, 0.5).to_rgba();
        assert!(blue.r.abs() < 1e-5 && (blue.b - 1.0).abs() < 1e-5);
        assert!((blue.a - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_brand_green_is_green() {
        let green = palette::PRIMARY.to_rgba();
        assert!(green.g > green.r && green.g > green.b);
    }

    #[test]
    fn test_intensity_tiers_strictly_ordered() {
        for pair in Intensity::ALL.windows(2) {
            let lo = pair[0].params();
            let hi = pair[1].params();
            assert!(lo.opacity < hi.opacity);
            assert!(lo.blur < hi.blur);
            assert!(lo.size < hi.size);
        }
    }

    #[test]
    fn test_hover_shadow_is_stronger() {
        for color in [TextColor::Primary, TextColor::Secondary, TextColor::Gradient] {
            let rest = color.resting_shadow();
            let hover = color.hover_shadow();
            for (r, h) in rest.iter().zip(hover.iter()) {
                assert!(h.blur > r.blur);
                assert!(h.color.a > r.color.a);
            }
        }
    }
}
