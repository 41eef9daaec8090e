/// A semantic role a palette swatch can be classified under.
///
/// Declaration order is the display order of the preview grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorTarget {
    Dominant,
    Vibrant,
    Muted,
    LightVibrant,
    LightMuted,
    DarkVibrant,
    DarkMuted,
}

/// Lower bound, ideal value and upper bound of an HSL component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub target: f32,
    pub max: f32,
}

impl Range {
    const fn new(min: f32, target: f32, max: f32) -> Self {
        Self { min, target, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Scoring criteria for one of the six non-dominant targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criteria {
    pub lightness: Range,
    pub saturation: Range,
}

const LIGHT: Range = Range::new(0.55, 0.74, 1.0);
const NORMAL: Range = Range::new(0.3, 0.5, 0.7);
const DARK: Range = Range::new(0.0, 0.26, 0.45);
const VIBRANT: Range = Range::new(0.35, 1.0, 1.0);
const MUTED: Range = Range::new(0.0, 0.3, 0.4);

pub const SATURATION_WEIGHT: f32 = 0.24;
pub const LIGHTNESS_WEIGHT: f32 = 0.52;
pub const POPULATION_WEIGHT: f32 = 0.24;

impl ColorTarget {
    /// All targets in grid order.
    pub const ALL: [ColorTarget; 7] = [
        ColorTarget::Dominant,
        ColorTarget::Vibrant,
        ColorTarget::Muted,
        ColorTarget::LightVibrant,
        ColorTarget::LightMuted,
        ColorTarget::DarkVibrant,
        ColorTarget::DarkMuted,
    ];

    /// Order in which the scored targets claim swatches. Earlier targets win
    /// contested swatches.
    pub const SCORING_ORDER: [ColorTarget; 6] = [
        ColorTarget::LightVibrant,
        ColorTarget::Vibrant,
        ColorTarget::DarkVibrant,
        ColorTarget::LightMuted,
        ColorTarget::Muted,
        ColorTarget::DarkMuted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColorTarget::Dominant => "Dominant",
            ColorTarget::Vibrant => "Vibrant",
            ColorTarget::Muted => "Muted",
            ColorTarget::LightVibrant => "Light Vibrant",
            ColorTarget::LightMuted => "Light Muted",
            ColorTarget::DarkVibrant => "Dark Vibrant",
            ColorTarget::DarkMuted => "Dark Muted",
        }
    }

    /// Selection criteria. `None` for [`ColorTarget::Dominant`], which is
    /// picked by population alone.
    pub fn criteria(self) -> Option<Criteria> {
        let (lightness, saturation) = match self {
            ColorTarget::Dominant => return None,
            ColorTarget::LightVibrant => (LIGHT, VIBRANT),
            ColorTarget::Vibrant => (NORMAL, VIBRANT),
            ColorTarget::DarkVibrant => (DARK, VIBRANT),
            ColorTarget::LightMuted => (LIGHT, MUTED),
            ColorTarget::Muted => (NORMAL, MUTED),
            ColorTarget::DarkMuted => (DARK, MUTED),
        };
        Some(Criteria {
            lightness,
            saturation,
        })
    }
}

impl std::fmt::Display for ColorTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_follows_declaration_order() {
        let mut sorted = ColorTarget::ALL;
        sorted.sort();
        assert_eq!(sorted, ColorTarget::ALL);
    }

    #[test]
    fn scoring_order_covers_every_non_dominant_target() {
        for target in ColorTarget::ALL {
            let scored = ColorTarget::SCORING_ORDER.contains(&target);
            assert_eq!(scored, target != ColorTarget::Dominant, "{target}");
            assert_eq!(target.criteria().is_some(), scored, "{target}");
        }
    }

    #[test]
    fn labels_are_distinct() {
        let mut labels: Vec<_> = ColorTarget::ALL.iter().map(|t| t.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 7);
    }

    #[test]
    fn ranges_bracket_their_targets() {
        for target in ColorTarget::SCORING_ORDER {
            let c = target.criteria().unwrap();
            for range in [c.lightness, c.saturation] {
                assert!(range.min <= range.target && range.target <= range.max);
            }
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let sum = SATURATION_WEIGHT + LIGHTNESS_WEIGHT + POPULATION_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-6);
    }
}
