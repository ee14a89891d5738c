use minifb::{Key, Window, WindowOptions};

use crate::field::FieldParams;
use crate::pass::{ContourPass, StepOutcome};
use crate::render::{self, MapRenderer};

/// Grid cells processed per frame. One cell per frame is faithful to a
/// per-tick host but crawls on large maps; a small budget still animates
/// the sweep visibly.
const CELLS_PER_FRAME: usize = 16;

/// Run the interactive map viewer.
/// Press R to regenerate, D for the debug overlay, N for the raw noise
/// field, Escape to exit.
pub fn run_viewer(width: usize, height: usize, cell_size: usize, initial_seed: Option<u64>) {
    let mut window = Window::new(
        "Island Generator - R: Regenerate, D: Debug, N: Noise, Esc: Exit",
        width,
        height,
        WindowOptions::default(),
    )
    .expect("Failed to create window");

    // Limit to ~60fps
    window.set_target_fps(60);

    let params = FieldParams::default();
    let mut seed = initial_seed.unwrap_or_else(rand::random);
    let mut pass = ContourPass::new(width, height, cell_size, &params, seed);
    let mut renderer = MapRenderer::new(width as u32, height as u32, seed);
    let mut show_debug = false;
    let mut show_noise = false;

    println!("Viewer started. Controls:");
    println!("  R: Regenerate with a new seed");
    println!("  D: Toggle cell-classification overlay");
    println!("  N: Toggle raw noise view");
    println!("  Esc: Exit");
    println!("Generating with seed: {}", seed);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::R, minifb::KeyRepeat::No) {
            seed = rand::random();
            println!("Regenerating with seed: {}", seed);
            // Discard the old pass outright; a pass is never reset in
            // flight.
            pass = ContourPass::new(width, height, cell_size, &params, seed);
            renderer = MapRenderer::new(width as u32, height as u32, seed);
        }
        if window.is_key_pressed(Key::D, minifb::KeyRepeat::No) {
            show_debug = !show_debug;
        }
        if window.is_key_pressed(Key::N, minifb::KeyRepeat::No) {
            show_noise = !show_noise;
        }

        for _ in 0..CELLS_PER_FRAME {
            match pass.step() {
                StepOutcome::Traced(contour) => renderer.draw_contour(&contour),
                StepOutcome::Advanced => {}
                StepOutcome::Complete => break,
            }
        }

        let mut frame = if show_noise {
            render::noise_view(pass.field(), params.sea_bias)
        } else {
            renderer.canvas().clone()
        };
        if show_debug && pass.grid().is_built() {
            render::debug_overlay(&mut frame, pass.grid());
        }

        let buffer: Vec<u32> = frame
            .pixels()
            .map(|p| (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32)
            .collect();
        window
            .update_with_buffer(&buffer, width, height)
            .expect("Failed to update window");
    }
}
