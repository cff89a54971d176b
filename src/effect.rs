//! Effect identifiers and the intensity control.

use std::fmt;
use std::str::FromStr;

/// The ten rendering variants, in identifier order `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Plain luminance.
    OriginalToGray,
    /// Pencil sketch, color-composited once more with itself.
    OriginalToSketch,
    /// Half original, half pencil sketch.
    OriginalToColoredSketch,
    /// Blur-divide soft pencil.
    OriginalToSoftSketch,
    /// Soft sketch averaged with the colored sketch.
    OriginalToSoftColorSketch,
    /// Pencil sketch of the grayscale image.
    GrayToSketch,
    /// Colored sketch of the grayscale image.
    GrayToColoredSketch,
    /// Soft sketch of the grayscale image.
    GrayToSoftSketch,
    /// Soft color sketch of the grayscale image.
    GrayToSoftColorSketch,
    /// Colored sketch computed from a pencil sketch.
    SketchToColoredSketch,
}

impl EffectKind {
    /// All effects in identifier order.
    pub const ALL: [EffectKind; 10] = [
        Self::OriginalToGray,
        Self::OriginalToSketch,
        Self::OriginalToColoredSketch,
        Self::OriginalToSoftSketch,
        Self::OriginalToSoftColorSketch,
        Self::GrayToSketch,
        Self::GrayToColoredSketch,
        Self::GrayToSoftSketch,
        Self::GrayToSoftColorSketch,
        Self::SketchToColoredSketch,
    ];

    /// Look up an effect by its numeric identifier. Returns `None` outside `0..=9`.
    #[must_use]
    pub fn from_id(id: i64) -> Option<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Numeric identifier of this effect.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::OriginalToGray => 0,
            Self::OriginalToSketch => 1,
            Self::OriginalToColoredSketch => 2,
            Self::OriginalToSoftSketch => 3,
            Self::OriginalToSoftColorSketch => 4,
            Self::GrayToSketch => 5,
            Self::GrayToColoredSketch => 6,
            Self::GrayToSoftSketch => 7,
            Self::GrayToSoftColorSketch => 8,
            Self::SketchToColoredSketch => 9,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OriginalToGray => "Original to Gray",
            Self::OriginalToSketch => "Original to Sketch",
            Self::OriginalToColoredSketch => "Original to Colored Sketch",
            Self::OriginalToSoftSketch => "Original to Soft Sketch",
            Self::OriginalToSoftColorSketch => "Original to Soft Color Sketch",
            Self::GrayToSketch => "Gray to Sketch",
            Self::GrayToColoredSketch => "Gray to Colored Sketch",
            Self::GrayToSoftSketch => "Gray to Soft Sketch",
            Self::GrayToSoftColorSketch => "Gray to Soft Color Sketch",
            Self::SketchToColoredSketch => "Sketch to Color Sketch",
        }
    }

    /// Kebab-case name, e.g. `gray-to-soft-sketch`.
    #[must_use]
    pub fn slug(self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses either a numeric id (`"5"`) or a kebab-case name (`"gray-to-sketch"`).
impl FromStr for EffectKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Self::from_id(id).ok_or_else(|| format!("effect id {id} is not in 0..=9"));
        }
        let wanted = s.to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|e| e.slug() == wanted)
            .ok_or_else(|| format!("unknown effect: {s}"))
    }
}

/// Blur/dodge strength in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Intensity(u32);

impl Intensity {
    /// Largest accepted value.
    pub const MAX: Intensity = Intensity(100);

    /// Create an intensity, saturating at [`Intensity::MAX`].
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.min(Self::MAX.0))
    }

    /// Raw value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Gaussian kernel span: `2 * value + 1`, always odd.
    #[must_use]
    pub fn kernel_size(self) -> u32 {
        2 * self.0 + 1
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::MAX
    }
}

impl From<u32> for Intensity {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_in_order() {
        for (i, effect) in EffectKind::ALL.iter().enumerate() {
            assert_eq!(usize::from(effect.id()), i);
            assert_eq!(EffectKind::from_id(i as i64), Some(*effect));
        }
    }

    #[test]
    fn out_of_range_ids_are_none() {
        assert_eq!(EffectKind::from_id(-1), None);
        assert_eq!(EffectKind::from_id(10), None);
        assert_eq!(EffectKind::from_id(99), None);
    }

    #[test]
    fn parses_ids_and_names() {
        assert_eq!("3".parse::<EffectKind>(), Ok(EffectKind::OriginalToSoftSketch));
        assert_eq!(
            "gray-to-soft-sketch".parse::<EffectKind>(),
            Ok(EffectKind::GrayToSoftSketch)
        );
        assert_eq!(
            "Sketch_To_Color_Sketch".parse::<EffectKind>(),
            Ok(EffectKind::SketchToColoredSketch)
        );
        assert!("42".parse::<EffectKind>().is_err());
        assert!("watercolor".parse::<EffectKind>().is_err());
    }

    #[test]
    fn intensity_saturates_and_yields_odd_kernels() {
        assert_eq!(Intensity::new(0).kernel_size(), 1);
        assert_eq!(Intensity::new(10).kernel_size(), 21);
        assert_eq!(Intensity::new(250), Intensity::MAX);
        assert_eq!(Intensity::default().kernel_size(), 201);
    }
}
