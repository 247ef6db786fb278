//! Bulk arrangement math: tile grids and cascades.
//!
//! Pure functions over rectangles; the manager decides which windows take part
//! and applies policy clamping afterwards.

use crate::geometry::{Point, Rect};

/// Columns and rows of a near-square grid holding `count` cells.
///
/// `columns = ceil(sqrt(count))`, `rows = ceil(count / columns)`.
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let mut columns = 1;
    while columns * columns < count {
        columns += 1;
    }
    let rows = (count + columns - 1) / columns;
    (columns, rows)
}

/// Cells of a grid covering `work`, filled row by row.
///
/// Tile sizes are floored, so a remainder of at most `columns - 1` pixels
/// (resp. `rows - 1`) is left at the right/bottom edge.
pub fn tile_cells(work: Rect, count: usize) -> Vec<Rect> {
    let (columns, rows) = grid_dimensions(count);
    if count == 0 {
        return Vec::new();
    }
    let tile_w = (work.w / columns as i32).max(1);
    let tile_h = (work.h / rows as i32).max(1);

    (0..count)
        .map(|index| {
            let col = (index % columns) as i32;
            let row = (index / columns) as i32;
            Rect::new(work.x + col * tile_w, work.y + row * tile_h, tile_w, tile_h)
        })
        .collect()
}

/// Origin of the `index`-th window in a diagonal cascade.
pub const fn cascade_origin(base: Point, index: usize, step: i32) -> Point {
    base.offset(index as i32 * step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_dimensions(0), (0, 0));
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(2), (2, 1));
        assert_eq!(grid_dimensions(3), (2, 2));
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (3, 2));
        assert_eq!(grid_dimensions(9), (3, 3));
        assert_eq!(grid_dimensions(10), (4, 3));
    }

    #[test]
    fn test_tile_cells_cover_work_area() {
        let work = Rect::new(0, 32, 1200, 800);
        let cells = tile_cells(work, 4);
        assert_eq!(
            cells,
            vec![
                Rect::new(0, 32, 600, 400),
                Rect::new(600, 32, 600, 400),
                Rect::new(0, 432, 600, 400),
                Rect::new(600, 432, 600, 400),
            ]
        );
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert!(!a.intersects(*b));
            }
        }
    }

    #[test]
    fn test_tile_cells_tiny_work_area() {
        let cells = tile_cells(Rect::new(0, 0, 2, 1), 9);
        assert!(cells.iter().all(|c| c.w >= 1 && c.h >= 1));
    }

    #[test]
    fn test_cascade_origin() {
        let base = Point::new(120, 60);
        assert_eq!(cascade_origin(base, 0, 30), Point::new(120, 60));
        assert_eq!(cascade_origin(base, 2, 30), Point::new(180, 120));
    }
}
