pub mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use image::DynamicImage;
use log::warn;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};

use crate::pipeline::generate::Palette;
use crate::pipeline::loader::{ExtractOptions, Loaded, PaletteLoader};
use crate::preview::{map_palette, PreviewColor, SwatchSource};
use widgets::{CaptionColors, CaptionPanel, ImageView, PaletteGrid, GRID_ROWS};

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

fn grid_position(index: usize) -> (usize, usize) {
    if index == 0 {
        (0, 0)
    } else {
        ((index + 1) / 2, (index + 1) % 2)
    }
}

/// Move the grid selection one step, staying on the grid.
///
/// Left and right stay within the current row.
pub fn move_selection(index: usize, direction: Direction) -> usize {
    let index = index.min(6);
    let (row, col) = grid_position(index);
    let to_row = |row: usize, col: usize| {
        let cells = GRID_ROWS[row];
        cells[col.min(cells.len() - 1)]
    };
    match direction {
        Direction::Up => to_row(row.saturating_sub(1), col),
        Direction::Down => to_row((row + 1).min(GRID_ROWS.len() - 1), col),
        Direction::Left => to_row(row, col.saturating_sub(1)),
        Direction::Right => to_row(row, col + 1),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    /// Typing a path to open.
    Prompt(String),
}

/// State for the interactive TUI application.
pub struct TuiApp {
    loader: PaletteLoader,
    palette: Option<Palette>,
    cells: [PreviewColor; 7],
    thumbnail: Option<DynamicImage>,
    image_path: Option<PathBuf>,
    image_size: Option<(u32, u32)>,
    selected: usize,
    caption: CaptionColors,
    mode: Mode,
    status: String,
    loading: bool,
    quit: bool,
}

impl TuiApp {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            loader: PaletteLoader::new(options),
            palette: None,
            cells: map_palette(&Palette::empty()),
            thumbnail: None,
            image_path: None,
            image_size: None,
            selected: 0,
            caption: CaptionColors::default(),
            mode: Mode::Browse,
            status: String::new(),
            loading: false,
            quit: false,
        }
    }

    /// Start loading an image. A newer pick replaces any load in flight.
    pub fn open(&mut self, path: PathBuf) {
        self.status = format!("Loading {}...", path.display());
        self.loading = true;
        self.loader.request(path);
    }

    pub fn cells(&self) -> &[PreviewColor; 7] {
        &self.cells
    }

    pub fn caption(&self) -> CaptionColors {
        self.caption
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Take in a finished load, if the latest one is ready.
    pub fn tick(&mut self) {
        if let Some(loaded) = self.loader.poll() {
            self.apply_loaded(loaded);
        }
    }

    #[cfg(test)]
    fn wait_for_load(&mut self, timeout: Duration) -> bool {
        match self.loader.wait(timeout) {
            Some(loaded) => {
                self.apply_loaded(loaded);
                true
            }
            None => false,
        }
    }

    fn apply_loaded(&mut self, loaded: Loaded) {
        self.loading = false;
        match loaded.result {
            Ok(image) => {
                self.status = format!(
                    "{}: {} swatches",
                    loaded.path.display(),
                    image.palette.swatches().len()
                );
                self.image_path = Some(loaded.path);
                self.image_size = Some((image.width, image.height));
                self.thumbnail = Some(image.thumbnail);
                self.palette = Some(image.palette);
            }
            Err(err) => {
                warn!("failed to load {}: {err:#}", loaded.path.display());
                self.status = format!("{err:#}");
                self.image_path = None;
                self.image_size = None;
                self.caption = CaptionColors::default();
                self.thumbnail = None;
                self.palette = None;
            }
        }
        self.cells = map_palette(&self.palette);
    }

    /// Use the selected cell for the caption panel.
    pub fn apply_selected(&mut self) {
        let cell = self.cells[self.selected];
        if self.palette.is_none() {
            self.status = "No image loaded".to_string();
        } else if let Some(target) = cell.target {
            if self.palette.swatch(target).is_none() {
                self.status = format!("No {} swatch found in this image", target.label());
            }
        }
        self.caption = CaptionColors::from_preview(&cell);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match &mut self.mode {
            Mode::Prompt(input) => match key.code {
                KeyCode::Enter => {
                    let path = PathBuf::from(input.trim());
                    self.mode = Mode::Browse;
                    if !path.as_os_str().is_empty() {
                        self.open(path);
                    }
                }
                KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            },
            Mode::Browse => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                KeyCode::Char('o') => self.mode = Mode::Prompt(String::new()),
                KeyCode::Up | KeyCode::Char('k') => self.step(Direction::Up),
                KeyCode::Down | KeyCode::Char('j') => self.step(Direction::Down),
                KeyCode::Left | KeyCode::Char('h') => self.step(Direction::Left),
                KeyCode::Right | KeyCode::Char('l') => self.step(Direction::Right),
                KeyCode::Enter | KeyCode::Char(' ') => self.apply_selected(),
                _ => {}
            },
        }
    }

    fn step(&mut self, direction: Direction) {
        self.selected = move_selection(self.selected, direction);
    }

    fn caption_text(&self) -> (String, String) {
        let title = self
            .image_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No image".to_string());
        let subtitle = self
            .image_size
            .map(|(w, h)| format!("{w}x{h}"))
            .unwrap_or_default();
        (title, subtitle)
    }

    pub fn render(&self, frame: &mut Frame) {
        let [top, grid, footer] = Layout::vertical([
            Constraint::Percentage(50),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let [image_area, caption_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]).areas(top);

        frame.render_widget(ImageView::new(self.thumbnail.as_ref()), image_area);
        let (title, subtitle) = self.caption_text();
        frame.render_widget(CaptionPanel::new(&title, &subtitle, self.caption), caption_area);
        frame.render_widget(PaletteGrid::new(&self.cells, Some(self.selected)), grid);

        let footer_line = match &self.mode {
            Mode::Prompt(input) => Line::from(vec![
                Span::styled(" Open: ", Style::default().fg(Color::Yellow)),
                Span::raw(input.as_str()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]),
            Mode::Browse => {
                let hint = " o open  arrows/hjkl move  enter apply  q quit";
                let status = if self.loading || !self.status.is_empty() {
                    format!(" | {}", self.status)
                } else {
                    String::new()
                };
                Line::styled(format!("{hint}{status}"), Style::default().fg(Color::DarkGray))
            }
        };
        frame.render_widget(Paragraph::new(footer_line), footer);
    }
}

/// Launch the TUI application.
pub fn run(mut app: TuiApp) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut TuiApp) -> Result<()> {
    while !app.should_quit() {
        app.tick();
        terminal
            .draw(|frame| app.render(frame))
            .context("failed to draw terminal frame")?;
        if event::poll(TICK).context("failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("failed to read terminal event")? {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
