//! Breadth-first 4-connected flood fill

use std::collections::VecDeque;

use super::pixel_buffer::PixelBuffer;
use super::types::{Color, GridPoint};

/// Replace the 4-connected region of the seed's color with `fill`
///
/// Matching is exact color equality. Returns the cells that were written, in
/// write order. Off-buffer seeds and seeds already painted `fill` do nothing.
pub fn flood_fill(buffer: &mut PixelBuffer, seed: GridPoint, fill: Color) -> Vec<GridPoint> {
    let target = match buffer.try_get(seed.x, seed.y) {
        Some(c) => c,
        None => return Vec::new(),
    };
    if target == fill {
        return Vec::new(); // Already filled
    }

    let mut written = vec![seed];
    buffer.set(seed.x, seed.y, fill);

    let mut queue = VecDeque::new();
    queue.push_back(seed);

    while let Some(cell) = queue.pop_front() {
        for neighbor in cell.neighbors4() {
            // Overwriting before enqueueing keeps each cell from being queued twice
            if buffer.try_get(neighbor.x, neighbor.y) == Some(target) {
                buffer.set(neighbor.x, neighbor.y, fill);
                written.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Color = Color::WHITE;
    const B: Color = Color::RED;
    const C: Color = Color::BLACK;

    #[test]
    fn test_fill_uniform_buffer() {
        let mut buf = PixelBuffer::filled(5, 5, A);
        let written = flood_fill(&mut buf, GridPoint::new(2, 2), B);
        assert_eq!(written.len(), 25);
        assert!(buf.pixels().iter().all(|&c| c == B));

        let before = buf.clone();
        assert!(flood_fill(&mut buf, GridPoint::new(2, 2), B).is_empty());
        assert_eq!(buf, before);
    }

    #[test]
    fn test_fill_respects_border() {
        let mut buf = PixelBuffer::filled(9, 9, A);
        // 1-cell ring of C from (1,1) to (7,7)
        for i in 1..=7 {
            buf.set(i, 1, C);
            buf.set(i, 7, C);
            buf.set(1, i, C);
            buf.set(7, i, C);
        }
        flood_fill(&mut buf, GridPoint::new(4, 4), B);

        for y in 0..9 {
            for x in 0..9 {
                let on_ring = (x == 1 || x == 7 || y == 1 || y == 7)
                    && (1..=7).contains(&x)
                    && (1..=7).contains(&y);
                let inside = (2..=6).contains(&x) && (2..=6).contains(&y);
                let expected = if on_ring { C } else if inside { B } else { A };
                assert_eq!(buf.get(x, y), expected, "cell ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_fill_does_not_cross_diagonals() {
        let mut buf = PixelBuffer::filled(2, 2, A);
        buf.set(1, 0, C);
        buf.set(0, 1, C);
        flood_fill(&mut buf, GridPoint::new(0, 0), B);
        assert_eq!(buf.get(0, 0), B);
        assert_eq!(buf.get(1, 1), A);
    }

    #[test]
    fn test_fill_corner_seed_and_isolated_cell() {
        let mut buf = PixelBuffer::filled(3, 1, A);
        buf.set(1, 0, C);
        let written = flood_fill(&mut buf, GridPoint::new(0, 0), B);
        assert_eq!(written, vec![GridPoint::new(0, 0)]);
        assert_eq!(buf.get(2, 0), A);
    }

    #[test]
    fn test_fill_out_of_bounds_seed() {
        let mut buf = PixelBuffer::filled(3, 3, A);
        assert!(flood_fill(&mut buf, GridPoint::new(-1, 0), B).is_empty());
        assert!(flood_fill(&mut buf, GridPoint::new(0, 3), B).is_empty());
        assert!(buf.pixels().iter().all(|&c| c == A));
    }
}
