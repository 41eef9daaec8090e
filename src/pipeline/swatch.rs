use crate::color::Color;

const MIN_CONTRAST_TITLE_TEXT: f32 = 3.0;
const MIN_CONTRAST_BODY_TEXT: f32 = 4.5;

const MIN_ALPHA_SEARCH_MAX_ITERATIONS: u32 = 10;
const MIN_ALPHA_SEARCH_PRECISION: u8 = 1;

/// A representative image color together with text colors that read well
/// on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub rgb: Color,
    /// Number of sampled pixels in this swatch's cluster.
    pub population: u32,
    pub title_text: Color,
    pub body_text: Color,
}

impl Swatch {
    /// Create a swatch and derive its title and body text colors.
    pub fn new(rgb: Color, population: u32) -> Self {
        let (title_text, body_text) = text_colors(rgb);
        Self {
            rgb,
            population,
            title_text,
            body_text,
        }
    }

    /// Create a swatch with caller-supplied text colors.
    pub fn with_text_colors(rgb: Color, title_text: Color, body_text: Color) -> Self {
        Self {
            rgb,
            population: 0,
            title_text,
            body_text,
        }
    }

    /// Hue in degrees, saturation and lightness in `[0, 1]`.
    pub fn hsl(&self) -> (f32, f32, f32) {
        self.rgb.to_hsl()
    }
}

/// Lowest alpha at which `fg` painted over `bg` still reaches `min_contrast`.
///
/// `None` when even the opaque foreground falls short.
fn minimum_alpha(fg: Color, bg: Color, min_contrast: f32) -> Option<u8> {
    if Color::contrast_ratio(&fg, &bg) < min_contrast {
        return None;
    }

    let mut min_alpha = 0u8;
    let mut max_alpha = 255u8;
    let mut iterations = 0;
    while iterations <= MIN_ALPHA_SEARCH_MAX_ITERATIONS
        && max_alpha - min_alpha > MIN_ALPHA_SEARCH_PRECISION
    {
        let alpha = ((min_alpha as u16 + max_alpha as u16) / 2) as u8;
        let blended = Color::composite(fg, alpha, bg);
        if Color::contrast_ratio(&blended, &bg) < min_contrast {
            min_alpha = alpha;
        } else {
            max_alpha = alpha;
        }
        iterations += 1;
    }
    Some(max_alpha)
}

/// Pick `(title, body)` text colors for a background.
///
/// White is preferred when it works for both, then black, then whichever
/// works per role. Results are flattened onto the background.
fn text_colors(bg: Color) -> (Color, Color) {
    let white = Color::WHITE;
    let black = Color::BLACK;

    let light_body = minimum_alpha(white, bg, MIN_CONTRAST_BODY_TEXT);
    let light_title = minimum_alpha(white, bg, MIN_CONTRAST_TITLE_TEXT);
    if let (Some(body), Some(title)) = (light_body, light_title) {
        return (
            Color::composite(white, title, bg),
            Color::composite(white, body, bg),
        );
    }

    let dark_body = minimum_alpha(black, bg, MIN_CONTRAST_BODY_TEXT);
    let dark_title = minimum_alpha(black, bg, MIN_CONTRAST_TITLE_TEXT);
    if let (Some(body), Some(title)) = (dark_body, dark_title) {
        return (
            Color::composite(black, title, bg),
            Color::composite(black, body, bg),
        );
    }

    let pick = |light: Option<u8>, dark: Option<u8>| match light {
        Some(alpha) => Color::composite(white, alpha, bg),
        None => Color::composite(black, dark.unwrap_or(255), bg),
    };
    (pick(light_title, dark_title), pick(light_body, dark_body))
}
