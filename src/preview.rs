use std::collections::HashMap;

use crate::color::Color;
use crate::pipeline::swatch::Swatch;
use crate::target::ColorTarget;

/// Lookup of the swatch chosen for each target, if any.
pub trait SwatchSource {
    fn swatch(&self, target: ColorTarget) -> Option<&Swatch>;
}

impl SwatchSource for HashMap<ColorTarget, Swatch> {
    fn swatch(&self, target: ColorTarget) -> Option<&Swatch> {
        self.get(&target)
    }
}

/// `None` stands for a failed extraction: every target is absent.
impl<S: SwatchSource> SwatchSource for Option<S> {
    fn swatch(&self, target: ColorTarget) -> Option<&Swatch> {
        self.as_ref().and_then(|source| source.swatch(target))
    }
}

/// Display-ready colors for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewColor {
    /// `None` marks a cell that was never filled.
    pub target: Option<ColorTarget>,
    pub background: Color,
    pub title_text: Color,
    pub body_text: Color,
}

impl PreviewColor {
    pub const DEFAULT_BACKGROUND: Color = Color::BLACK;
    pub const DEFAULT_TITLE_TEXT: Color = Color::WHITE;
    pub const DEFAULT_BODY_TEXT: Color = Color::WHITE;

    /// Default colors for a target whose swatch is missing.
    pub const fn fallback(target: Option<ColorTarget>) -> Self {
        Self {
            target,
            background: Self::DEFAULT_BACKGROUND,
            title_text: Self::DEFAULT_TITLE_TEXT,
            body_text: Self::DEFAULT_BODY_TEXT,
        }
    }

    /// A cell with no target and default colors.
    pub const fn unfilled() -> Self {
        Self::fallback(None)
    }

    fn from_swatch(target: ColorTarget, swatch: &Swatch) -> Self {
        Self {
            target: Some(target),
            background: swatch.rgb,
            title_text: swatch.title_text,
            body_text: swatch.body_text,
        }
    }
}

/// Map a palette onto the seven grid cells, in [`ColorTarget::ALL`] order.
///
/// Absent swatches become black cells with white text, still tagged with
/// their target.
pub fn map_palette<S: SwatchSource + ?Sized>(source: &S) -> [PreviewColor; 7] {
    ColorTarget::ALL.map(|target| match source.swatch(target) {
        Some(swatch) => PreviewColor::from_swatch(target, swatch),
        None => PreviewColor::fallback(Some(target)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swatch(bg: u32, title: u32, body: u32) -> Swatch {
        Swatch::with_text_colors(
            Color::from_packed(bg),
            Color::from_packed(title),
            Color::from_packed(body),
        )
    }

    fn full_source() -> HashMap<ColorTarget, Swatch> {
        ColorTarget::ALL
            .iter()
            .enumerate()
            .map(|(i, &target)| {
                let i = i as u32;
                (target, swatch(0x100000 * (i + 1), 0x000100 * i, 0x000001 * i))
            })
            .collect()
    }

    #[test]
    fn all_present_echoes_swatches_in_order() {
        let source = full_source();
        let cells = map_palette(&source);
        assert_eq!(cells.len(), 7);
        for (cell, target) in cells.iter().zip(ColorTarget::ALL) {
            let expected = &source[&target];
            assert_eq!(cell.target, Some(target));
            assert_eq!(cell.background, expected.rgb);
            assert_eq!(cell.title_text, expected.title_text);
            assert_eq!(cell.body_text, expected.body_text);
        }
    }

    #[test]
    fn all_absent_yields_tagged_defaults() {
        let cells = map_palette(&HashMap::new());
        for (cell, target) in cells.iter().zip(ColorTarget::ALL) {
            assert_eq!(cell.target, Some(target));
            assert_eq!(cell.background.to_packed(), 0x000000);
            assert_eq!(cell.title_text.to_packed(), 0xFFFFFF);
            assert_eq!(cell.body_text.to_packed(), 0xFFFFFF);
        }
    }

    #[test]
    fn dominant_only_scenario() {
        let mut source = HashMap::new();
        source.insert(ColorTarget::Dominant, swatch(0xFF0000, 0xFFFFFF, 0xCCCCCC));

        let cells = map_palette(&source);

        assert_eq!(
            cells[0],
            PreviewColor {
                target: Some(ColorTarget::Dominant),
                background: Color::from_packed(0xFF0000),
                title_text: Color::from_packed(0xFFFFFF),
                body_text: Color::from_packed(0xCCCCCC),
            }
        );
        for (cell, target) in cells[1..].iter().zip(&ColorTarget::ALL[1..]) {
            assert_eq!(*cell, PreviewColor::fallback(Some(*target)));
        }
    }

    #[test]
    fn mixed_presence_is_independent_per_target() {
        let full = full_source();
        let mut sparse = full.clone();
        sparse.remove(&ColorTarget::Muted);
        sparse.remove(&ColorTarget::DarkVibrant);

        let from_full = map_palette(&full);
        let from_sparse = map_palette(&sparse);
        for (i, target) in ColorTarget::ALL.iter().enumerate() {
            if matches!(target, ColorTarget::Muted | ColorTarget::DarkVibrant) {
                assert_eq!(from_sparse[i], PreviewColor::fallback(Some(*target)));
            } else {
                assert_eq!(from_sparse[i], from_full[i]);
            }
        }
    }

    #[test]
    fn output_order_ignores_insertion_order() {
        let full = full_source();
        let mut reversed = HashMap::new();
        for target in ColorTarget::ALL.iter().rev() {
            reversed.insert(*target, full[target]);
        }
        assert_eq!(map_palette(&full), map_palette(&reversed));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let source = full_source();
        assert_eq!(map_palette(&source), map_palette(&source));
    }

    #[test]
    fn failed_extraction_maps_like_empty() {
        let failed: Option<HashMap<ColorTarget, Swatch>> = None;
        assert_eq!(map_palette(&failed), map_palette(&HashMap::new()));
    }

    #[test]
    fn unfilled_has_no_target() {
        let cell = PreviewColor::unfilled();
        assert_eq!(cell.target, None);
        assert_eq!(cell.background, Color::BLACK);
        assert_eq!(cell.title_text, Color::WHITE);
    }
}
