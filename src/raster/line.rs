//! Bresenham line traversal and stamped thick lines

use super::types::GridPoint;
use crate::math::Vec2;

/// Integer Bresenham walk from `start` to `end`, both inclusive
///
/// Each yielded cell is 8-connected to the previous one. Error terms are
/// kept in `i64` so endpoints anywhere in `i32` range cannot overflow; callers
/// still clip long segments first, since the walk visits every cell.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    current: GridPoint,
    end: GridPoint,
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: GridPoint, end: GridPoint) -> Self {
        let dx = (end.x as i64 - start.x as i64).abs();
        let dy = -(end.y as i64 - start.y as i64).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = GridPoint;

    fn next(&mut self) -> Option<GridPoint> {
        if self.done {
            return None;
        }
        let point = self.current;
        if point == self.end {
            self.done = true;
            return Some(point);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.current.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.current.y += self.sy;
        }
        Some(point)
    }
}

/// Cohen-Sutherland clip of a segment in continuous grid space against the
/// box `min..=max`. Returns None when the segment misses the box or an
/// endpoint is not finite.
pub fn clip_segment(mut a: Vec2, mut b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    const INSIDE: u8 = 0;
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const BOTTOM: u8 = 4;
    const TOP: u8 = 8;
    // Converges in at most 4 passes for finite input
    const MAX_ITERATIONS: u32 = 8;

    let finite = |p: Vec2| p.x.is_finite() && p.y.is_finite();
    if !finite(a) || !finite(b) {
        return None;
    }

    let outcode = |p: Vec2| -> u8 {
        let mut code = INSIDE;
        if p.x < min.x {
            code |= LEFT;
        } else if p.x > max.x {
            code |= RIGHT;
        }
        if p.y < min.y {
            code |= BOTTOM;
        } else if p.y > max.y {
            code |= TOP;
        }
        code
    };

    let mut code_a = outcode(a);
    let mut code_b = outcode(b);

    for _ in 0..MAX_ITERATIONS {
        if (code_a | code_b) == 0 {
            return Some((a, b));
        }
        if (code_a & code_b) != 0 {
            return None;
        }

        let code_out = if code_a != 0 { code_a } else { code_b };
        let d = b - a;
        // The flagged axis always has a non-zero extent here
        let p = if (code_out & TOP) != 0 {
            Vec2::new(a.x + (max.y - a.y) * (d.x / d.y), max.y)
        } else if (code_out & BOTTOM) != 0 {
            Vec2::new(a.x + (min.y - a.y) * (d.x / d.y), min.y)
        } else if (code_out & RIGHT) != 0 {
            Vec2::new(max.x, a.y + (max.x - a.x) * (d.y / d.x))
        } else {
            Vec2::new(min.x, a.y + (min.x - a.x) * (d.y / d.x))
        };
        if !finite(p) {
            return None;
        }

        if code_out == code_a {
            a = p;
            code_a = outcode(a);
        } else {
            b = p;
            code_b = outcode(b);
        }
    }
    None
}

/// Append the cells of a one-pixel line
pub fn rasterize_line(start: GridPoint, end: GridPoint, out: &mut Vec<GridPoint>) {
    out.extend(BresenhamLine::new(start, end));
}

/// Offsets stamped for a brush of `size`: every `(dx, dy)` with
/// `dx, dy` in `[-size/2, size/2)`. Size 1 stamps only the centre and
/// size 0 stamps nothing.
pub fn brush_offsets(size: u32) -> Vec<(i32, i32)> {
    match size {
        0 => return Vec::new(),
        1 => return vec![(0, 0)],
        _ => {}
    }
    let half = (size / 2) as i32;
    let mut offsets = Vec::with_capacity((half * half * 4) as usize);
    for dx in -half..half {
        for dy in -half..half {
            offsets.push((dx, dy));
        }
    }
    offsets
}

/// Thick line as the union of parallel one-pixel lines, one per brush offset.
/// Overlapping cells are kept; writing them twice is harmless.
pub fn rasterize_thick_line(start: GridPoint, end: GridPoint, size: u32, out: &mut Vec<GridPoint>) {
    for (dx, dy) in brush_offsets(size) {
        rasterize_line(start.offset(dx, dy), end.offset(dx, dy), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<GridPoint> {
        BresenhamLine::new(GridPoint::new(x0, y0), GridPoint::new(x1, y1)).collect()
    }

    fn is_8_connected(points: &[GridPoint]) -> bool {
        points
            .windows(2)
            .all(|w| (w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1 && w[0] != w[1])
    }

    #[test]
    fn test_horizontal_line() {
        let expected: Vec<GridPoint> = (0..=5).map(|x| GridPoint::new(x, 0)).collect();
        assert_eq!(line(0, 0, 5, 0), expected);
    }

    #[test]
    fn test_diagonal_line() {
        let pts = line(0, 0, 3, 3);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], GridPoint::new(0, 0));
        assert_eq!(*pts.last().unwrap(), GridPoint::new(3, 3));
        assert!(is_8_connected(&pts));
    }

    #[test]
    fn test_endpoints_in_every_octant() {
        let ends = [(7, 2), (2, 7), (-2, 7), (-7, 2), (-7, -2), (-2, -7), (2, -7), (7, -2)];
        for &(x, y) in &ends {
            let pts = line(0, 0, x, y);
            assert_eq!(pts[0], GridPoint::new(0, 0));
            assert_eq!(*pts.last().unwrap(), GridPoint::new(x, y));
            assert!(is_8_connected(&pts), "gap in line to ({}, {})", x, y);
            assert_eq!(pts.len() as i32, x.abs().max(y.abs()) + 1);
        }
    }

    #[test]
    fn test_single_point_line() {
        assert_eq!(line(4, -3, 4, -3), vec![GridPoint::new(4, -3)]);
    }

    #[test]
    fn test_extreme_endpoints_do_not_overflow() {
        let start = GridPoint::new(i32::MIN, 0);
        let end = GridPoint::new(i32::MAX, 1);
        let mut walk = BresenhamLine::new(start, end);
        assert_eq!(walk.next(), Some(start));
        let second = walk.next().unwrap();
        assert_eq!(second.x, i32::MIN + 1);
    }

    #[test]
    fn test_clip_inside_is_unchanged() {
        let (a, b) = (Vec2::new(1.0, 2.0), Vec2::new(5.5, 3.0));
        let clipped = clip_segment(a, b, Vec2::new(-1.0, -1.0), Vec2::new(10.0, 10.0));
        assert_eq!(clipped, Some((a, b)));
    }

    #[test]
    fn test_clip_far_overshoot() {
        let (a, b) = clip_segment(
            Vec2::new(4.0, 4.0),
            Vec2::new(1.0e9, 4.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(32.0, 32.0),
        )
        .unwrap();
        assert_eq!(a, Vec2::new(4.0, 4.0));
        assert_eq!(b, Vec2::new(32.0, 4.0));
    }

    #[test]
    fn test_clip_diagonal_crossing_corner() {
        let (a, b) = clip_segment(
            Vec2::new(-10.0, -10.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
        )
        .unwrap();
        assert_eq!(a, Vec2::new(0.0, 0.0));
        assert_eq!(b, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_clip_rejects_missing_and_non_finite() {
        let (min, max) = (Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(clip_segment(Vec2::new(-5.0, 20.0), Vec2::new(-1.0, 30.0), min, max), None);
        assert_eq!(clip_segment(Vec2::new(f32::NAN, 1.0), Vec2::new(2.0, 2.0), min, max), None);
        assert_eq!(clip_segment(Vec2::new(1.0, 1.0), Vec2::new(f32::INFINITY, 2.0), min, max), None);
    }

    #[test]
    fn test_brush_offsets() {
        assert!(brush_offsets(0).is_empty());
        assert_eq!(brush_offsets(1), vec![(0, 0)]);
        assert_eq!(brush_offsets(2), vec![(-1, -1), (-1, 0), (0, -1), (0, 0)]);
        // Odd sizes round down to the even stamp below them
        assert_eq!(brush_offsets(3).len(), 4);
        assert_eq!(brush_offsets(4).len(), 16);
    }

    #[test]
    fn test_thick_line_covers_stamp() {
        let mut out = Vec::new();
        rasterize_thick_line(GridPoint::new(5, 5), GridPoint::new(8, 5), 2, &mut out);
        for x in 5..=8 {
            for &(dx, dy) in &[(-1, -1), (-1, 0), (0, -1), (0, 0)] {
                assert!(out.contains(&GridPoint::new(x + dx, 5 + dy)));
            }
        }
        assert_eq!(out.len(), 4 * 4);
    }
}
