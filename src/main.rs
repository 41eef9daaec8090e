use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use palette_preview::cli::Args;
use palette_preview::output::format_listing;
use palette_preview::pipeline::loader::load_palette;
use palette_preview::preview::map_palette;
use palette_preview::tui::{self, TuiApp};

fn init_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(args.log_level());
    // RUST_LOG, when set, takes precedence over -v.
    builder.parse_default_env();
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let options = args.extract_options();

    let path = match &args.image {
        Some(path) if !args.interactive() => path,
        image => {
            let mut app = TuiApp::new(options);
            if let Some(path) = image {
                app.open(path.clone());
            }
            return tui::run(app);
        }
    };

    let loaded = load_palette(path, options)?;
    info!(
        "{}: {}x{}, {} swatches",
        path.display(),
        loaded.width,
        loaded.height,
        loaded.palette.swatches().len()
    );
    let cells = map_palette(&loaded.palette);
    print!("{}", format_listing(&cells, args.preview));
    Ok(())
}
