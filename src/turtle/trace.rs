use crate::foundation::core::{BezPath, Point, Rect, Vec2};

/// Turtle cursor shared by the measuring and drawing passes.
///
/// Heading is in degrees. `+` turns by subtracting the turn angle, `-` by
/// adding it; `F` advances along the heading, `B` against it. Symbols other
/// than those four leave the cursor untouched.
#[derive(Clone, Copy, Debug)]
pub struct TurtleState {
    pos: Point,
    heading_deg: f64,
}

impl TurtleState {
    pub fn new(start: Point, heading_deg: f64) -> Self {
        Self {
            pos: start,
            heading_deg,
        }
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    /// Apply one instruction symbol at the given step length.
    ///
    /// Returns the new position when the symbol moved the cursor.
    pub fn apply(&mut self, symbol: char, turn_angle_deg: f64, step: f64) -> Option<Point> {
        match symbol {
            'F' => {
                self.pos += self.advance(step);
                Some(self.pos)
            }
            'B' => {
                self.pos -= self.advance(step);
                Some(self.pos)
            }
            '+' => {
                self.heading_deg -= turn_angle_deg;
                None
            }
            '-' => {
                self.heading_deg += turn_angle_deg;
                None
            }
            _ => None,
        }
    }

    fn advance(&self, step: f64) -> Vec2 {
        let rad = self.heading_deg.to_radians();
        Vec2::new(step * rad.cos(), step * rad.sin())
    }
}

/// Extents of a unit-step trace plus the translation that moves the
/// bounding box's minimum corner to the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathBounds {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Walk `instructions` from the origin at unit step length and report the
/// bounding box of every visited position, the start included.
///
/// A path that fully retraces itself yields zero width or height; that is
/// the true extent and is returned as-is.
pub fn trace_bounds(
    instructions: &str,
    turn_angle_deg: f64,
    initial_heading_deg: f64,
) -> PathBounds {
    let mut turtle = TurtleState::new(Point::ZERO, initial_heading_deg);
    let mut bounds = Rect::ZERO;
    for symbol in instructions.chars() {
        turtle.apply(symbol, turn_angle_deg, 1.0);
        bounds = bounds.union_pt(turtle.pos());
    }
    PathBounds {
        width: bounds.width(),
        height: bounds.height(),
        offset_x: -bounds.x0,
        offset_y: -bounds.y0,
    }
}

/// Walk `instructions` from `start` at a physical step length and emit the
/// visited polyline as a single open subpath. The pen never lifts: every
/// `F`/`B` extends the previous segment's endpoint.
pub fn trace_path(
    instructions: &str,
    turn_angle_deg: f64,
    initial_heading_deg: f64,
    start: Point,
    step: f64,
) -> BezPath {
    let mut turtle = TurtleState::new(start, initial_heading_deg);
    let mut path = BezPath::new();
    path.move_to(start);
    for symbol in instructions.chars() {
        if let Some(end) = turtle.apply(symbol, turn_angle_deg, step) {
            path.line_to(end);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{a} != {b}");
    }

    #[test]
    fn single_forward_spans_unit_width() {
        let b = trace_bounds("F", 90.0, 0.0);
        assert_close(b.width, 1.0);
        assert_close(b.height, 0.0);
        assert_close(b.offset_x, 0.0);
        assert_close(b.offset_y, 0.0);
    }

    #[test]
    fn plus_turns_clockwise_in_screen_space() {
        // (0,0) -> (1,0), then heading drops to -90 and the turtle walks
        // up to (1,-1): the min corner moves off the origin in y only.
        let b = trace_bounds("F+F", 90.0, 0.0);
        assert_close(b.width, 1.0);
        assert_close(b.height, 1.0);
        assert_close(b.offset_x, 0.0);
        assert_close(b.offset_y, 1.0);
    }

    #[test]
    fn backward_mirrors_forward() {
        let b = trace_bounds("B", 90.0, 0.0);
        assert_close(b.width, 1.0);
        assert_close(b.offset_x, 1.0);
    }

    #[test]
    fn inert_symbols_do_not_move_the_turtle() {
        let plain = trace_bounds("FF+F", 60.0, 30.0);
        let noisy = trace_bounds("FXYFZ+WF", 60.0, 30.0);
        assert_close(plain.width, noisy.width);
        assert_close(plain.height, noisy.height);
        assert_close(plain.offset_x, noisy.offset_x);
        assert_close(plain.offset_y, noisy.offset_y);
    }

    #[test]
    fn bounds_grow_monotonically_with_prefixes() {
        let instructions = "F+F+F+F-FF";
        for cut in 0..instructions.len() {
            let shorter = trace_bounds(&instructions[..cut], 90.0, 0.0);
            let longer = trace_bounds(instructions, 90.0, 0.0);
            assert!(longer.width + EPS >= shorter.width);
            assert!(longer.height + EPS >= shorter.height);
        }
    }

    #[test]
    fn bounds_are_never_negative() {
        let b = trace_bounds("-F--FF-B+F", 72.5, 13.0);
        assert!(b.width >= 0.0);
        assert!(b.height >= 0.0);
    }

    #[test]
    fn retraced_path_is_degenerate() {
        let b = trace_bounds("FB", 90.0, 45.0);
        assert!(b.width > 0.0);
        assert_close(b.height, b.width); // 45 degrees: equal extents
        let b = trace_bounds("FB", 90.0, 0.0);
        assert_close(b.height, 0.0);
    }

    #[test]
    fn path_walks_scaled_segments_from_start() {
        let path = trace_path("F+F", 90.0, 0.0, Point::new(10.0, 10.0), 2.0);
        let els: Vec<PathEl> = path.elements().to_vec();
        assert_eq!(els.len(), 3);
        assert!(matches!(els[0], PathEl::MoveTo(p) if (p - Point::new(10.0, 10.0)).hypot() < EPS));
        assert!(matches!(els[1], PathEl::LineTo(p) if (p - Point::new(12.0, 10.0)).hypot() < EPS));
        assert!(matches!(els[2], PathEl::LineTo(p) if (p - Point::new(12.0, 8.0)).hypot() < EPS));
    }

    #[test]
    fn path_without_moves_is_a_lone_move_to() {
        let path = trace_path("+-XY", 90.0, 0.0, Point::ZERO, 3.0);
        assert_eq!(path.elements().len(), 1);
        assert!(matches!(path.elements()[0], PathEl::MoveTo(_)));
    }
}
