use log::debug;

use crate::pipeline::extract::ExtractedColor;
use crate::pipeline::swatch::Swatch;
use crate::preview::SwatchSource;
use crate::target::{
    ColorTarget, Criteria, LIGHTNESS_WEIGHT, POPULATION_WEIGHT, SATURATION_WEIGHT,
};

const BLACK_MAX_LIGHTNESS: f32 = 0.05;
const WHITE_MIN_LIGHTNESS: f32 = 0.95;

/// Swatches found in an image plus the one chosen for each target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    swatches: Vec<Swatch>,
    selected: [Option<Swatch>; 7],
}

impl Palette {
    /// A palette with no swatches at all (no image, or nothing usable in it).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build swatches from clustered colors and assign them to targets.
    pub fn from_colors(colors: &[ExtractedColor]) -> Self {
        let swatches: Vec<Swatch> = colors
            .iter()
            .map(|c| Swatch::new(c.color, c.population))
            .filter(|s| {
                let keep = is_allowed(s);
                if !keep {
                    debug!("filtered swatch {} (population {})", s.rgb, s.population);
                }
                keep
            })
            .collect();

        let mut selected: [Option<Swatch>; 7] = Default::default();
        selected[ColorTarget::Dominant as usize] =
            swatches.iter().max_by_key(|s| s.population).copied();

        let max_population = swatches.iter().map(|s| s.population).max().unwrap_or(0);
        let mut used = vec![false; swatches.len()];
        for target in ColorTarget::SCORING_ORDER {
            let Some(criteria) = target.criteria() else {
                continue;
            };
            if let Some(idx) = best_match(&swatches, &used, &criteria, max_population) {
                used[idx] = true;
                selected[target as usize] = Some(swatches[idx]);
            }
        }

        Self { swatches, selected }
    }

    /// All swatches that survived filtering, in population order.
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn get(&self, target: ColorTarget) -> Option<&Swatch> {
        self.selected[target as usize].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }
}

impl SwatchSource for Palette {
    fn swatch(&self, target: ColorTarget) -> Option<&Swatch> {
        self.get(target)
    }
}

/// Rejects near-black, near-white and skin-tone-like swatches.
fn is_allowed(swatch: &Swatch) -> bool {
    let (hue, saturation, lightness) = swatch.hsl();
    let near_black = lightness <= BLACK_MAX_LIGHTNESS;
    let near_white = lightness >= WHITE_MIN_LIGHTNESS;
    let near_red_i_line = (10.0..=37.0).contains(&hue) && saturation <= 0.82;
    !(near_black || near_white || near_red_i_line)
}

fn best_match(
    swatches: &[Swatch],
    used: &[bool],
    criteria: &Criteria,
    max_population: u32,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, swatch) in swatches.iter().enumerate() {
        if used[idx] {
            continue;
        }
        let (_, saturation, lightness) = swatch.hsl();
        if !criteria.saturation.contains(saturation) || !criteria.lightness.contains(lightness) {
            continue;
        }
        let score = score(saturation, lightness, swatch.population, criteria, max_population);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

fn score(
    saturation: f32,
    lightness: f32,
    population: u32,
    criteria: &Criteria,
    max_population: u32,
) -> f32 {
    let saturation_score =
        SATURATION_WEIGHT * (1.0 - (saturation - criteria.saturation.target).abs());
    let lightness_score = LIGHTNESS_WEIGHT * (1.0 - (lightness - criteria.lightness.target).abs());
    let population_score = if max_population > 0 {
        POPULATION_WEIGHT * (population as f32 / max_population as f32)
    } else {
        0.0
    };
    saturation_score + lightness_score + population_score
}
