use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use image::DynamicImage;
use log::{debug, info};

use crate::pipeline::extract::{extract_colors, open_image, prepare};
use crate::pipeline::generate::Palette;

/// Longest side of the thumbnail kept for display.
const THUMBNAIL_DIM: u32 = 256;

/// Extraction settings shared by every request.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub clusters: usize,
    pub max_dim: u32,
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub palette: Palette,
    pub thumbnail: DynamicImage,
    pub width: u32,
    pub height: u32,
}

/// A finished request, tagged with the generation it was issued under.
#[derive(Debug)]
pub struct Loaded {
    pub generation: u64,
    pub path: PathBuf,
    pub result: Result<LoadedImage>,
}

/// Load an image and run the full extraction pipeline on the calling thread.
pub fn load_palette(path: &std::path::Path, options: ExtractOptions) -> Result<LoadedImage> {
    let img = open_image(path)?;
    let pixels = prepare(&img, options.max_dim);
    let colors = extract_colors(&pixels, options.clusters);
    let palette = Palette::from_colors(&colors);
    debug!(
        "{}: {} clusters, {} usable swatches",
        path.display(),
        colors.len(),
        palette.swatches().len()
    );
    Ok(LoadedImage {
        palette,
        thumbnail: img.thumbnail(THUMBNAIL_DIM, THUMBNAIL_DIM),
        width: img.width(),
        height: img.height(),
    })
}

/// Runs loads on worker threads and hands back only the most recent one.
pub struct PaletteLoader {
    options: ExtractOptions,
    latest: u64,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
}

impl PaletteLoader {
    pub fn new(options: ExtractOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            options,
            latest: 0,
            tx,
            rx,
        }
    }

    /// Start loading `path`. Any request still in flight is superseded.
    pub fn request(&mut self, path: PathBuf) -> u64 {
        self.latest += 1;
        let generation = self.latest;
        let options = self.options;
        let tx = self.tx.clone();
        info!("loading {} (request {generation})", path.display());
        thread::spawn(move || {
            let result = load_palette(&path, options);
            // The receiver only disappears when the loader is dropped.
            let _ = tx.send(Loaded {
                generation,
                path,
                result,
            });
        });
        generation
    }

    /// Non-blocking: the latest request's result if it has arrived.
    pub fn poll(&mut self) -> Option<Loaded> {
        while let Ok(loaded) = self.rx.try_recv() {
            if let Some(loaded) = self.accept(loaded) {
                return Some(loaded);
            }
        }
        None
    }

    /// Block up to `timeout` for the latest request's result.
    pub fn wait(&mut self, timeout: Duration) -> Option<Loaded> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(loaded) => {
                    if let Some(loaded) = self.accept(loaded) {
                        return Some(loaded);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    fn accept(&self, loaded: Loaded) -> Option<Loaded> {
        if loaded.generation == self.latest {
            Some(loaded)
        } else {
            debug!(
                "discarding stale result for {} (request {}, latest {})",
                loaded.path.display(),
                loaded.generation,
                self.latest
            );
            None
        }
    }
}
