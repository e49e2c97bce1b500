mod logging;
mod preview;

use std::fs;
use std::path::PathBuf;

use border_core::constants::MARKER_HALF_LEN;
use border_core::{MapDeclaration, Strategy, build_table_with};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "border-table",
    version,
    about = "Precompute shared-border midpoints for adjacent map regions"
)]
struct Cli {
    /// Map declaration: regions (path descriptions) and adjacency pairs
    input: PathBuf,
    /// Where to write the midpoint table
    output: PathBuf,
    /// Estimator strategy, overrides the declaration (dense|live)
    #[arg(long)]
    strategy: Option<Strategy>,
    #[arg(long)]
    samples: Option<usize>,
    #[arg(long)]
    match_threshold: Option<f64>,
    #[arg(long)]
    run_gap: Option<f64>,
    #[arg(long)]
    centroid_snap: Option<f64>,
    /// Also render regions and markers to an .svg or .png file
    #[arg(long)]
    preview: Option<PathBuf>,
    #[arg(long, default_value_t = 1.0)]
    px_per_unit: f64,
    #[arg(long, default_value_t = MARKER_HALF_LEN)]
    marker_half_len: f64,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let txt = fs::read_to_string(&cli.input)?;
    let decl = MapDeclaration::from_json(&txt)?;

    let mut est = decl.estimator.clone();
    if let Some(s) = cli.strategy {
        est.strategy = s;
    }
    est.samples = cli.samples.or(est.samples);
    est.match_threshold = cli.match_threshold.or(est.match_threshold);
    est.run_gap = cli.run_gap.or(est.run_gap);
    est.centroid_snap = cli.centroid_snap.or(est.centroid_snap);
    let config = est.config();

    log::info!(
        "{} region(s), {} adjacency pair(s), strategy {} ({config:?})",
        decl.regions.len(),
        decl.adjacency.len(),
        est.strategy
    );
    let table = build_table_with(&decl, est.strategy, config)?;
    fs::write(&cli.output, table.to_json_pretty()?)?;
    log::info!("wrote {} midpoint(s) to {}", table.len(), cli.output.display());

    if let Some(path) = &cli.preview {
        let shapes = decl.shapes();
        let (svg, w_px, h_px) =
            preview::build_preview_svg(&shapes, &table, cli.px_per_unit, cli.marker_half_len);
        let is_png = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            preview::render_png(&svg, w_px, h_px, &path.to_string_lossy())?;
        } else {
            fs::write(path, svg)?;
        }
        log::info!("preview {}x{} -> {}", w_px, h_px, path.display());
    }
    Ok(())
}
