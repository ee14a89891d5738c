use crate::contour::{trace, Contour};
use crate::field::{FieldParams, HeightField};
use crate::grid::CellGrid;

/// What a single step of the generation pass produced.
pub enum StepOutcome {
    /// The cursor cell started a new boundary loop.
    Traced(Contour),
    /// The cursor cell was water, interior land, or already swept into an
    /// earlier loop.
    Advanced,
    /// The pass had already finished; nothing happened.
    Complete,
}

/// Incremental driver for one full generation pass.
///
/// The cursor covers the grid in row-major order, one cell per `step()`,
/// so a host loop can interleave generation with per-frame work;
/// `run_to_completion()` is the batch entry point. The grid is classified
/// once, before the first cell is inspected. A pass in flight is cancelled
/// by dropping it; `reset` is only valid between passes.
pub struct ContourPass {
    field: HeightField,
    grid: CellGrid,
    cell_size: usize,
    x: usize,
    y: usize,
    complete: bool,
}

impl ContourPass {
    pub fn new(
        pixel_width: usize,
        pixel_height: usize,
        cell_size: usize,
        params: &FieldParams,
        seed: u64,
    ) -> Self {
        let field = HeightField::generate(pixel_width, pixel_height, params, seed);
        Self::with_field(field, cell_size)
    }

    /// Build a pass over an existing field (synthetic fields in tests come
    /// through here).
    pub fn with_field(field: HeightField, cell_size: usize) -> Self {
        let grid = CellGrid::new(field.width(), field.height(), cell_size);
        // A grid smaller than one cell has nothing to trace.
        let complete = grid.width() == 0 || grid.height() == 0;
        Self {
            field,
            grid,
            cell_size,
            x: 0,
            y: 0,
            complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The classified grid (the debug overlay reads it).
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// The sampled field (the raw-noise view reads it).
    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Process the cell under the cursor and advance. The classification
    /// pass over the whole grid runs once, before the first cell.
    pub fn step(&mut self) -> StepOutcome {
        if self.complete {
            return StepOutcome::Complete;
        }

        if self.x == 0 && self.y == 0 {
            self.grid.build(&self.field);
        }

        let outcome = if self.grid.cell(self.x, self.y).visited {
            StepOutcome::Advanced
        } else {
            match trace(&mut self.grid, self.x, self.y) {
                Some(contour) => StepOutcome::Traced(contour),
                None => StepOutcome::Advanced,
            }
        };

        self.x += 1;
        if self.x == self.grid.width() {
            self.x = 0;
            self.y += 1;
            if self.y == self.grid.height() {
                self.complete = true;
            }
        }

        outcome
    }

    /// Drain the pass, returning every traced contour.
    pub fn run_to_completion(&mut self) -> Vec<Contour> {
        let mut contours = Vec::new();
        while !self.complete {
            if let StepOutcome::Traced(contour) = self.step() {
                contours.push(contour);
            }
        }
        contours
    }

    /// Start a fresh pass over a newly sampled field. Must not be called
    /// while a pass is in flight; finish or drop the current one first.
    pub fn reset(&mut self, params: &FieldParams, seed: u64) {
        debug_assert!(
            self.complete || (self.x == 0 && self.y == 0),
            "reset during a pass in flight"
        );
        self.field = HeightField::generate(self.field.width(), self.field.height(), params, seed);
        self.grid = CellGrid::new(self.field.width(), self.field.height(), self.cell_size);
        self.x = 0;
        self.y = 0;
        self.complete = self.grid.width() == 0 || self.grid.height() == 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::Contour;

    fn collect_stepwise(pass: &mut ContourPass) -> Vec<Contour> {
        let mut contours = Vec::new();
        let cells = pass.grid().width() * pass.grid().height();
        for _ in 0..cells {
            if let StepOutcome::Traced(contour) = pass.step() {
                contours.push(contour);
            }
        }
        contours
    }

    #[test]
    fn test_all_water_field_produces_no_loops() {
        let mut pass = ContourPass::with_field(HeightField::constant(80, 80, -0.3), 10);
        let contours = pass.run_to_completion();
        assert!(contours.is_empty());
        assert!(pass.is_complete());
    }

    #[test]
    fn test_all_land_field_produces_the_border_coast() {
        // The forced water ring turns a uniformly positive field into one
        // rectangular coastline hugging the map border.
        let mut pass = ContourPass::with_field(HeightField::constant(80, 80, 0.5), 10);
        let contours = pass.run_to_completion();
        assert_eq!(contours.len(), 1);
        assert!(contours[0].encloses_land);
    }

    #[test]
    fn test_full_run_completes_and_stays_complete() {
        let params = FieldParams::default();
        let mut pass = ContourPass::new(120, 90, 10, &params, 42);
        pass.run_to_completion();
        assert!(pass.is_complete());

        // Idempotent once complete.
        assert!(matches!(pass.step(), StepOutcome::Complete));
        assert!(pass.run_to_completion().is_empty());
    }

    #[test]
    fn test_every_boundary_cell_is_swept() {
        let params = FieldParams::default();
        let mut pass = ContourPass::new(200, 150, 10, &params, 7);
        pass.run_to_completion();

        let grid = pass.grid();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let cell = grid.cell(x, y);
                if cell.tile.is_boundary() {
                    assert!(cell.visited, "unswept boundary cell at ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_two_runs_are_bit_identical() {
        let params = FieldParams::default();
        let mut a = ContourPass::new(160, 120, 10, &params, 2024);
        let mut b = ContourPass::new(160, 120, 10, &params, 2024);
        assert_eq!(a.run_to_completion(), b.run_to_completion());
    }

    #[test]
    fn test_stepwise_equals_batch() {
        let params = FieldParams::default();
        let mut stepped = ContourPass::new(160, 120, 10, &params, 99);
        let mut batch = ContourPass::new(160, 120, 10, &params, 99);

        let a = collect_stepwise(&mut stepped);
        assert!(stepped.is_complete());
        let b = batch.run_to_completion();
        assert_eq!(a, b);
    }

    #[test]
    fn test_visited_count_is_monotonic() {
        let params = FieldParams::default();
        let mut pass = ContourPass::new(120, 120, 10, &params, 5);

        let mut last = 0;
        while !pass.is_complete() {
            pass.step();
            let count = pass.grid().visited_count();
            assert!(count >= last);
            last = count;
        }
    }

    #[test]
    fn test_reset_regenerates() {
        let params = FieldParams::default();
        let mut pass = ContourPass::new(120, 90, 10, &params, 1);
        let first = pass.run_to_completion();

        pass.reset(&params, 1);
        assert!(!pass.is_complete());
        assert_eq!(pass.run_to_completion(), first);

        pass.reset(&params, 2);
        let third = pass.run_to_completion();
        // Different seed, different coastline (overwhelmingly likely).
        assert_ne!(first, third);
    }
}
