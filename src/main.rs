use clap::Parser;

use island_generator::export;
use island_generator::field::FieldParams;
use island_generator::pass::ContourPass;
use island_generator::render::{self, MapRenderer};
use island_generator::viewer;

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate procedural island maps with smooth coastlines")]
struct Args {
    /// Width of the map in pixels
    #[arg(short = 'W', long, default_value = "800")]
    width: usize,

    /// Height of the map in pixels
    #[arg(short = 'H', long, default_value = "600")]
    height: usize,

    /// Grid cell size in pixels
    #[arg(short, long, default_value = "10")]
    cell_size: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output PNG path
    #[arg(short, long, default_value = "island_map.png")]
    output: String,

    /// Export traced contours to a JSON file
    #[arg(long)]
    export_json: Option<String>,

    /// Open the interactive viewer instead of batch rendering
    #[arg(long)]
    viewer: bool,

    /// Draw the cell-classification overlay into the output image
    #[arg(long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    if args.viewer {
        viewer::run_viewer(args.width, args.height, args.cell_size, Some(seed));
        return;
    }

    println!("Generating island map with seed: {}", seed);
    println!(
        "Map size: {}x{} pixels, {}x{} cells",
        args.width,
        args.height,
        args.width / args.cell_size,
        args.height / args.cell_size
    );

    let params = FieldParams::default();
    let mut pass = ContourPass::new(args.width, args.height, args.cell_size, &params, seed);
    let contours = pass.run_to_completion();

    let islands = contours.iter().filter(|c| c.encloses_land).count();
    println!(
        "Traced {} coastline loops ({} islands, {} lakes)",
        contours.len(),
        islands,
        contours.len() - islands
    );

    let mut renderer = MapRenderer::new(args.width as u32, args.height as u32, seed);
    for contour in &contours {
        renderer.draw_contour(contour);
    }

    if args.debug {
        let mut canvas = renderer.canvas().clone();
        render::debug_overlay(&mut canvas, pass.grid());
        save_or_die(&canvas, &args.output);
    } else {
        save_or_die(renderer.canvas(), &args.output);
    }
    println!("Saved map to {}", args.output);

    if let Some(path) = &args.export_json {
        if let Err(e) = export::export_contours_json(&contours, path) {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        }
        println!("Exported {} contours to {}", contours.len(), path);
    }
}

fn save_or_die(canvas: &image::RgbaImage, path: &str) {
    if let Err(e) = export::save_png(canvas, path) {
        eprintln!("Failed to save {}: {}", path, e);
        std::process::exit(1);
    }
}
