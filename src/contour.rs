use serde::{Deserialize, Serialize};

use crate::grid::CellGrid;
use crate::tiles::Dir;

/// A point in map (pixel) space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// One closed coastline loop: the ordered control points of an island or
/// lake outline, plus whether the enclosed region is land.
///
/// The point list deliberately overlaps itself. The walk's entry crossing
/// leads, and after the loop closes the first two exit crossings are
/// emitted again. A spline renderer treats the first and last points as
/// control-only, so without the doubled tail the drawn curve would stop
/// one segment short of the true start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
    pub encloses_land: bool,
}

/// Follow the boundary starting at cell (x, y) and return the closed loop,
/// or `None` when the cell has no boundary crossing. Every cell the walk
/// passes through is marked visited.
///
/// For a fixed grid the walk is fully deterministic: the starting edge is
/// the first linked edge in Top, Left, Right, Bottom order, and every
/// subsequent move is dictated by the tile table.
pub fn trace(grid: &mut CellGrid, start_x: usize, start_y: usize) -> Option<Contour> {
    let mut entry = grid.cell(start_x, start_y).tile.first_link()?;

    let mut points = Vec::new();
    // The loop's first point is where the boundary enters the start cell.
    points.push(crossing(grid, start_x, start_y, entry));

    let mut x = start_x;
    let mut y = start_y;
    loop {
        grid.mark_visited(x, y);
        let exit = linked_exit(grid, x, y, entry);
        points.push(crossing(grid, x, y, exit));
        let (nx, ny) = advance(x, y, exit);
        x = nx;
        y = ny;
        entry = exit.opposite();
        if (x, y) == (start_x, start_y) {
            break;
        }
    }

    // Pass through the first two cells once more so the tail covers the
    // segment a control-point renderer would otherwise drop.
    let exit = linked_exit(grid, x, y, entry);
    points.push(crossing(grid, x, y, exit));
    let (nx, ny) = advance(x, y, exit);
    x = nx;
    y = ny;
    entry = exit.opposite();
    let exit = linked_exit(grid, x, y, entry);
    points.push(crossing(grid, x, y, exit));

    let encloses_land = grid.cell(x, y).tile.land_inside;

    Some(Contour {
        points,
        encloses_land,
    })
}

fn linked_exit(grid: &CellGrid, x: usize, y: usize, entry: Dir) -> Dir {
    grid.cell(x, y)
        .tile
        .link(entry)
        .expect("boundary walk entered a cell with no continuing link")
}

fn crossing(grid: &CellGrid, x: usize, y: usize, edge: Dir) -> Point {
    let (px, py) = grid.edge_crossing(x, y, edge);
    Point { x: px, y: py }
}

fn advance(x: usize, y: usize, exit: Dir) -> (usize, usize) {
    // The outer corner ring is forced water, so no link ever crosses the
    // grid boundary and the casts cannot underflow.
    let (dx, dy) = exit.offset();
    ((x as i32 + dx) as usize, (y as i32 + dy) as usize)
}
