use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use kmeans_colors::get_kmeans_hamerly;
use palette::{IntoColor, Lab, Srgb};

use crate::color::Color;

/// A color cluster found in the image with its pixel count.
#[derive(Debug, Clone)]
pub struct ExtractedColor {
    pub color: Color,
    pub population: u32,
}

pub const DEFAULT_MAX_DIM: u32 = 112;
pub const DEFAULT_CLUSTERS: usize = 16;

const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const SEED: u64 = 42;
const DEDUP_THRESHOLD: f32 = 25.0; // ΔE² < 25 means ΔE < 5

/// Open and decode an image file.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        }
    })
}

/// Downscale so neither side exceeds `max_dim` (preserving aspect ratio)
/// and convert all pixels to CIELAB.
pub fn prepare(img: &DynamicImage, max_dim: u32) -> Vec<Lab> {
    let max_dim = max_dim.max(1);
    let rgb_img = if img.width() > max_dim || img.height() > max_dim {
        img.resize(max_dim, max_dim, FilterType::Triangle).to_rgb8()
    } else {
        img.to_rgb8()
    };

    rgb_img
        .pixels()
        .map(|p| {
            let srgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
            srgb.into_color()
        })
        .collect()
}

/// Cluster LAB pixels into at most `k` representative colors.
///
/// Returns deduplicated colors sorted by population (descending).
/// Uses Hamerly's algorithm with K-means++ initialization.
pub fn extract_colors(pixels: &[Lab], k: usize) -> Vec<ExtractedColor> {
    let k = k.min(pixels.len()).min(u8::MAX as usize + 1);
    if k == 0 {
        return Vec::new();
    }

    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, SEED);

    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut colors: Vec<ExtractedColor> = result
        .centroids
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count > 0)
        .map(|(lab, &count)| ExtractedColor {
            color: Color::from_lab(*lab),
            population: count,
        })
        .collect();

    deduplicate(&mut colors);
    colors.sort_by(|a, b| b.population.cmp(&a.population));

    colors
}

/// Merge colors that are too similar (ΔE < 5 in LAB space).
/// Keeps the first color and accumulates the population.
fn deduplicate(colors: &mut Vec<ExtractedColor>) {
    let mut i = 0;
    while i < colors.len() {
        let mut j = i + 1;
        while j < colors.len() {
            let lab_i = colors[i].color.to_lab();
            let lab_j = colors[j].color.to_lab();
            let delta_e_sq = (lab_i.l - lab_j.l).powi(2)
                + (lab_i.a - lab_j.a).powi(2)
                + (lab_i.b - lab_j.b).powi(2);
            if delta_e_sq < DEDUP_THRESHOLD {
                colors[i].population += colors[j].population;
                colors.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn load_pixels(path: &Path) -> Result<Vec<Lab>> {
        Ok(prepare(&open_image(path)?, DEFAULT_MAX_DIM))
    }

    fn lab(r: u8, g: u8, b: u8) -> Lab {
        Color::new(r, g, b).to_lab()
    }

    // --- open_image / prepare tests ---

    #[test]
    fn load_small_png_keeps_every_pixel() {
        let path = fixture_path("unit-4x4.png");
        create_test_image_solid(&path, 4, 4, [128, 128, 128]);

        let pixels = load_pixels(&path).unwrap();
        assert_eq!(pixels.len(), 16);
    }

    #[test]
    fn load_large_image_resizes() {
        let path = fixture_path("unit-448x448.png");
        create_test_image_solid(&path, 448, 448, [128, 128, 128]);

        let pixels = load_pixels(&path).unwrap();
        assert_eq!(pixels.len(), 112 * 112);
    }

    #[test]
    fn load_nonsquare_preserves_aspect_ratio() {
        let path = fixture_path("unit-448x224.png");
        create_test_image_solid(&path, 448, 224, [128, 128, 128]);

        let pixels = load_pixels(&path).unwrap();
        assert_eq!(pixels.len(), 112 * 56);
    }

    #[test]
    fn load_file_not_found() {
        let result = load_pixels(Path::new("/nonexistent/image.png"));
        let err = format!("{:#}", result.unwrap_err());
        assert!(
            err.contains("file not found"),
            "expected file-not-found error, got: {err}"
        );
    }

    #[test]
    fn load_unsupported_format() {
        let path = fixture_path("unit-not-an-image.txt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "this is not an image").unwrap();

        let err = format!("{:#}", load_pixels(&path).unwrap_err());
        assert!(
            err.contains("unsupported"),
            "expected unsupported format error, got: {err}"
        );
    }

    // --- extract_colors tests ---

    #[test]
    fn empty_pixels_produce_no_colors() {
        assert!(extract_colors(&[], DEFAULT_CLUSTERS).is_empty());
    }

    #[test]
    fn fewer_pixels_than_clusters() {
        let pixels = vec![lab(200, 50, 50), lab(50, 50, 200)];
        let colors = extract_colors(&pixels, DEFAULT_CLUSTERS);
        let total: u32 = colors.iter().map(|c| c.population).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn uniform_image_produces_one_dominant_color() {
        let pixels = vec![lab(200, 50, 50); 1000];

        let colors = extract_colors(&pixels, 8);

        assert!(
            colors.len() <= 2,
            "uniform image should produce ~1 color after dedup, got {}",
            colors.len()
        );
        assert!(
            colors[0].population > 800,
            "dominant population should be >800, got {}",
            colors[0].population
        );
    }

    #[test]
    fn populations_account_for_every_pixel() {
        let mut pixels = vec![lab(200, 50, 50); 600];
        pixels.extend(vec![lab(50, 50, 200); 300]);
        pixels.extend(vec![lab(50, 200, 50); 100]);

        let colors = extract_colors(&pixels, 8);
        let total: u32 = colors.iter().map(|c| c.population).sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn results_sorted_by_population_descending() {
        let mut pixels = vec![lab(200, 50, 50); 600];
        pixels.extend(vec![lab(50, 50, 200); 300]);
        pixels.extend(vec![lab(50, 200, 50); 100]);

        let colors = extract_colors(&pixels, 8);

        for window in colors.windows(2) {
            assert!(
                window[0].population >= window[1].population,
                "colors not sorted by population: {} < {}",
                window[0].population,
                window[1].population
            );
        }
    }

    #[test]
    fn deduplication_merges_similar_colors() {
        let lab1 = Lab::new(50.0, 20.0, 30.0);
        let lab2 = Lab::new(51.0, 20.5, 30.5); // ΔE ≈ 1.2, should be merged

        let mut pixels = vec![lab1; 500];
        pixels.extend(vec![lab2; 500]);

        let colors = extract_colors(&pixels, 4);

        assert!(
            colors.len() <= 2,
            "near-identical colors should be deduplicated, got {}",
            colors.len()
        );
    }

    // --- test helpers ---

    fn create_test_image_solid(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
        let img = image::RgbImage::from_fn(width, height, |_, _| image::Rgb(rgb));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        img.save(path).unwrap();
    }
}
