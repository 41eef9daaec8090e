use image::imageops::FilterType;
use image::DynamicImage;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::color::Color as AppColor;
use crate::preview::PreviewColor;

const MISSING_LABEL: &str = "Missing color";

/// Grid rows as cell indices: dominant alone, then pairs.
pub const GRID_ROWS: [&[usize]; 4] = [&[0], &[1, 2], &[3, 4], &[5, 6]];

fn to_color(c: AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Colors applied to the caption panel below the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionColors {
    pub background: AppColor,
    pub title: AppColor,
    pub secondary: AppColor,
}

impl Default for CaptionColors {
    fn default() -> Self {
        Self {
            background: AppColor::BLACK,
            title: AppColor::WHITE,
            secondary: AppColor::new(0x88, 0x88, 0x88),
        }
    }
}

impl CaptionColors {
    pub fn from_preview(cell: &PreviewColor) -> Self {
        Self {
            background: cell.background,
            title: cell.title_text,
            secondary: cell.body_text,
        }
    }
}

/// The seven palette cells. Missing entries in `cells` render as unfilled.
pub struct PaletteGrid<'a> {
    cells: &'a [PreviewColor],
    selected: Option<usize>,
}

impl<'a> PaletteGrid<'a> {
    pub fn new(cells: &'a [PreviewColor], selected: Option<usize>) -> Self {
        Self { cells, selected }
    }
}

fn render_cell(cell: PreviewColor, selected: bool, area: Rect, buf: &mut Buffer) {
    let (title, body) = match cell.target {
        Some(target) => (
            target.label().to_string(),
            format!("Text on {}", target.label()),
        ),
        None => (MISSING_LABEL.to_string(), MISSING_LABEL.to_string()),
    };

    let bg = to_color(cell.background);
    let mut block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(bg))
        .border_style(Style::default().fg(bg));
    if selected {
        block = block
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(to_color(cell.title_text)));
    }
    let inner = block.inner(area);
    block.render(area, buf);

    let pad = inner.height.saturating_sub(2) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    let mut title_style = Style::default()
        .fg(to_color(cell.title_text))
        .add_modifier(Modifier::BOLD);
    if selected {
        title_style = title_style.add_modifier(Modifier::UNDERLINED);
    }
    lines.push(Line::styled(title, title_style));
    lines.push(Line::styled(body, Style::default().fg(to_color(cell.body_text))));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}

impl Widget for PaletteGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::vertical([Constraint::Ratio(1, 4); 4]).split(area);
        for (row_area, indices) in rows.iter().zip(GRID_ROWS) {
            let constraints = vec![Constraint::Ratio(1, indices.len() as u32); indices.len()];
            let columns = Layout::horizontal(constraints).spacing(1).split(*row_area);
            for (cell_area, &idx) in columns.iter().zip(indices) {
                let cell = self
                    .cells
                    .get(idx)
                    .copied()
                    .unwrap_or(PreviewColor::unfilled());
                render_cell(cell, self.selected == Some(idx), *cell_area, buf);
            }
        }
    }
}

/// Caption text on the selected swatch background.
pub struct CaptionPanel<'a> {
    title: &'a str,
    subtitle: &'a str,
    colors: CaptionColors,
}

impl<'a> CaptionPanel<'a> {
    pub fn new(title: &'a str, subtitle: &'a str, colors: CaptionColors) -> Self {
        Self {
            title,
            subtitle,
            colors,
        }
    }
}

impl Widget for CaptionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::styled(
                format!(" {}", self.title),
                Style::default()
                    .fg(to_color(self.colors.title))
                    .add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                format!(" {}", self.subtitle),
                Style::default().fg(to_color(self.colors.secondary)),
            ),
        ];
        Paragraph::new(lines)
            .style(Style::default().bg(to_color(self.colors.background)))
            .render(area, buf);
    }
}

/// The picked image, cropped to fill the area and drawn with half blocks.
/// Without an image, a prompt box is shown instead.
pub struct ImageView<'a> {
    image: Option<&'a DynamicImage>,
}

impl<'a> ImageView<'a> {
    pub fn new(image: Option<&'a DynamicImage>) -> Self {
        Self { image }
    }
}

impl Widget for ImageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let Some(image) = self.image else {
            render_prompt(area, buf);
            return;
        };

        let pixels = image
            .resize_to_fill(area.width as u32, area.height as u32 * 2, FilterType::Triangle)
            .to_rgb8();
        for y in 0..area.height.min((pixels.height() / 2) as u16) {
            for x in 0..area.width.min(pixels.width() as u16) {
                let top = pixels.get_pixel(x as u32, y as u32 * 2);
                let bottom = pixels.get_pixel(x as u32, y as u32 * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                    cell.set_symbol("▀")
                        .set_fg(Color::Rgb(top[0], top[1], top[2]))
                        .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}

fn render_prompt(area: Rect, buf: &mut Buffer) {
    let width = area.width.min(30);
    let height = area.height.min(7);
    let boxed = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(boxed);
    block.render(boxed, buf);

    let pad = inner.height.saturating_sub(1) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    lines.push(Line::styled(
        "Press o to pick an image",
        Style::default().fg(Color::DarkGray),
    ));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::generate::Palette;
    use crate::preview::map_palette;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn grid_rows_cover_all_cells_once() {
        let mut all: Vec<usize> = GRID_ROWS.iter().flat_map(|r| r.iter().copied()).collect();
        all.sort_unstable();
        assert_eq!(all, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn grid_renders_every_label() {
        let cells = map_palette(&Palette::empty());
        let area = Rect::new(0, 0, 60, 24);
        let mut buf = Buffer::empty(area);
        PaletteGrid::new(&cells, Some(0)).render(area, &mut buf);

        let text = buffer_text(&buf);
        for label in ["Dominant", "Vibrant", "Muted", "Light Vibrant", "Dark Muted"] {
            assert!(text.contains(label), "missing {label} in\n{text}");
        }
        assert!(text.contains("Text on Dominant"));
    }

    #[test]
    fn short_cell_list_renders_missing_cells() {
        let area = Rect::new(0, 0, 60, 24);
        let mut buf = Buffer::empty(area);
        PaletteGrid::new(&[], None).render(area, &mut buf);
        assert!(buffer_text(&buf).contains(MISSING_LABEL));
    }

    #[test]
    fn caption_uses_panel_colors() {
        let colors = CaptionColors {
            background: AppColor::new(10, 20, 30),
            title: AppColor::new(250, 250, 250),
            secondary: AppColor::new(200, 200, 200),
        };
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        CaptionPanel::new("sunset", "64x64", colors).render(area, &mut buf);

        assert!(buffer_text(&buf).contains("sunset"));
        assert_eq!(buf[(1, 0)].fg, Color::Rgb(250, 250, 250));
        assert_eq!(buf[(1, 1)].fg, Color::Rgb(200, 200, 200));
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn image_view_paints_half_blocks() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(8, 8, |_, _| {
            image::Rgb([200, 40, 40])
        }));
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        ImageView::new(Some(&img)).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "▀");
        assert_eq!(buf[(3, 1)].bg, Color::Rgb(200, 40, 40));
    }

    #[test]
    fn image_view_without_image_prompts() {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        ImageView::new(None).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("pick an image"));
    }
}
