use crossterm::style::{Color as TermColor, Stylize};

use crate::color::Color;
use crate::preview::PreviewColor;

const LABEL_WIDTH: usize = 13;
const MISSING_LABEL: &str = "Missing color";

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

fn label(cell: &PreviewColor) -> &'static str {
    cell.target.map_or(MISSING_LABEL, |t| t.label())
}

/// One line per cell: `label  bg #rrggbb  title #rrggbb  body #rrggbb`.
///
/// With `colored`, each line starts with a truecolor swatch that shows the
/// label in its title color on its background.
pub fn format_listing(cells: &[PreviewColor], colored: bool) -> String {
    let mut out = String::new();
    for cell in cells {
        if colored {
            let chip = format!(" {:^width$} ", label(cell), width = LABEL_WIDTH)
                .with(term_color(cell.title_text))
                .on(term_color(cell.background));
            out.push_str(&format!("{chip} "));
        }
        out.push_str(&format!(
            "{:<width$}  bg {}  title {}  body {}\n",
            label(cell),
            cell.background,
            cell.title_text,
            cell.body_text,
            width = LABEL_WIDTH,
        ));
    }
    out
}
