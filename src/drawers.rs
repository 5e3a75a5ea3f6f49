//! Outline drawers for each glyph of the face.
//!
//! Every drawer issues a fixed sequence of absolute move/line/curve/close
//! commands. Rounded parts approximate circular arcs with two cubic
//! segments whose handles sit at fixed fractions of the radius.

use crate::{
    metrics::{CAP_HEIGHT, STROKE_WIDTH, X_HEIGHT},
    OutlinePen,
};

/// Left edge of every letter body except I
const LEFT: f64 = 100.0;
/// Body width shared by U, N, D and A
const BODY_WIDTH: f64 = 600.0;

const OUTER_HANDLE: f64 = 0.45;
const INNER_HANDLE: f64 = 0.78;
const INNER_HANDLE_INSET: f64 = 0.22;
const BOWL_HANDLE: f64 = 0.55;

/// Upright rectangle from (x0, y0) to (x1, y1), counter-clockwise from the
/// bottom left corner.
fn rectangle(pen: &mut dyn OutlinePen, x0: f64, y0: f64, x1: f64, y1: f64) {
    pen.move_to(x0, y0);
    pen.line_to(x1, y0);
    pen.line_to(x1, y1);
    pen.line_to(x0, y1);
    pen.close();
}

/// F: full height stem, top bar and a middle bar centred on the x-height.
pub fn draw_f(pen: &mut dyn OutlinePen) {
    rectangle(pen, LEFT, 0.0, LEFT + STROKE_WIDTH, CAP_HEIGHT);
    rectangle(pen, LEFT, CAP_HEIGHT - STROKE_WIDTH, 500.0, CAP_HEIGHT);
    rectangle(
        pen,
        LEFT,
        X_HEIGHT - STROKE_WIDTH / 2.0,
        450.0,
        X_HEIGHT + STROKE_WIDTH / 2.0,
    );
}

/// U: a single contour running down the outside of the bowl and back up
/// the inside.
pub fn draw_u(pen: &mut dyn OutlinePen) {
    let inner_width = BODY_WIDTH - 2.0 * STROKE_WIDTH;
    let radius = inner_width / 2.0;
    let right = LEFT + BODY_WIDTH;
    let shoulder = radius + STROKE_WIDTH;

    pen.move_to(LEFT, CAP_HEIGHT);
    pen.line_to(LEFT, shoulder);
    pen.curve_to(
        LEFT,
        radius * OUTER_HANDLE,
        LEFT + radius * OUTER_HANDLE,
        0.0,
        LEFT + radius,
        0.0,
    );
    pen.curve_to(
        right - radius * OUTER_HANDLE,
        0.0,
        right,
        radius * OUTER_HANDLE,
        right,
        shoulder,
    );
    pen.line_to(right, CAP_HEIGHT);
    pen.line_to(right - STROKE_WIDTH, CAP_HEIGHT);
    pen.line_to(right - STROKE_WIDTH, shoulder);
    pen.curve_to(
        right - STROKE_WIDTH,
        radius * INNER_HANDLE,
        LEFT + radius + radius * INNER_HANDLE_INSET,
        STROKE_WIDTH,
        LEFT + radius,
        STROKE_WIDTH,
    );
    pen.curve_to(
        LEFT + radius - radius * INNER_HANDLE_INSET,
        STROKE_WIDTH,
        LEFT + STROKE_WIDTH,
        radius * INNER_HANDLE,
        LEFT + STROKE_WIDTH,
        shoulder,
    );
    pen.line_to(LEFT + STROKE_WIDTH, CAP_HEIGHT);
    pen.close();
}

/// N: two stems joined by a diagonal from the top of the left stem.
pub fn draw_n(pen: &mut dyn OutlinePen) {
    let right = LEFT + BODY_WIDTH;

    rectangle(pen, LEFT, 0.0, LEFT + STROKE_WIDTH, CAP_HEIGHT);

    pen.move_to(LEFT + STROKE_WIDTH, CAP_HEIGHT);
    pen.line_to(right - STROKE_WIDTH, 0.0);
    pen.line_to(right, 0.0);
    pen.line_to(LEFT + STROKE_WIDTH * 1.5, CAP_HEIGHT);
    pen.close();

    rectangle(pen, right - STROKE_WIDTH, 0.0, right, CAP_HEIGHT);
}

/// D: a stem, then the upper and lower halves of the bowl as separate
/// contours meeting at mid cap height.
pub fn draw_d(pen: &mut dyn OutlinePen) {
    let right = LEFT + BODY_WIDTH;
    let radius = (CAP_HEIGHT - STROKE_WIDTH) / 2.0;
    let inner_radius = radius - STROKE_WIDTH;
    let middle = CAP_HEIGHT / 2.0;

    rectangle(pen, LEFT, 0.0, LEFT + STROKE_WIDTH, CAP_HEIGHT);

    // Upper half
    pen.move_to(LEFT, CAP_HEIGHT - STROKE_WIDTH);
    pen.line_to(LEFT + radius, CAP_HEIGHT - STROKE_WIDTH);
    pen.curve_to(
        LEFT + radius + radius * BOWL_HANDLE,
        CAP_HEIGHT - STROKE_WIDTH,
        right,
        middle + radius * BOWL_HANDLE,
        right,
        middle,
    );
    pen.line_to(right - STROKE_WIDTH, middle);
    pen.curve_to(
        right - STROKE_WIDTH,
        middle + inner_radius * BOWL_HANDLE,
        LEFT + radius + inner_radius * BOWL_HANDLE,
        CAP_HEIGHT - STROKE_WIDTH * 2.0,
        LEFT + radius,
        CAP_HEIGHT - STROKE_WIDTH * 2.0,
    );
    pen.line_to(LEFT + STROKE_WIDTH, CAP_HEIGHT - STROKE_WIDTH * 2.0);
    pen.line_to(LEFT + STROKE_WIDTH, CAP_HEIGHT - STROKE_WIDTH);
    pen.close();

    // Lower half
    pen.move_to(LEFT + STROKE_WIDTH, STROKE_WIDTH);
    pen.line_to(LEFT + radius, STROKE_WIDTH);
    pen.curve_to(
        LEFT + radius + inner_radius * BOWL_HANDLE,
        STROKE_WIDTH,
        right - STROKE_WIDTH,
        middle - inner_radius * BOWL_HANDLE,
        right - STROKE_WIDTH,
        middle,
    );
    pen.line_to(right, middle);
    pen.curve_to(
        right,
        middle - radius * BOWL_HANDLE,
        LEFT + radius + radius * BOWL_HANDLE,
        STROKE_WIDTH * 2.0,
        LEFT + radius,
        0.0,
    );
    pen.line_to(LEFT, 0.0);
    pen.line_to(LEFT, STROKE_WIDTH);
    pen.line_to(LEFT + STROKE_WIDTH, STROKE_WIDTH);
    pen.close();
}

/// A: two diagonals meeting at the apex, and a trapezoidal crossbar.
pub fn draw_a(pen: &mut dyn OutlinePen) {
    let right = LEFT + BODY_WIDTH;
    let apex_x = LEFT + BODY_WIDTH / 2.0;

    pen.move_to(LEFT, 0.0);
    pen.line_to(LEFT + STROKE_WIDTH * 1.2, 0.0);
    pen.line_to(apex_x, CAP_HEIGHT);
    pen.line_to(apex_x - STROKE_WIDTH * 0.6, CAP_HEIGHT);
    pen.close();

    pen.move_to(right - STROKE_WIDTH * 1.2, 0.0);
    pen.line_to(right, 0.0);
    pen.line_to(apex_x + STROKE_WIDTH * 0.6, CAP_HEIGHT);
    pen.line_to(apex_x, CAP_HEIGHT);
    pen.close();

    let crossbar_y = CAP_HEIGHT * 0.35;
    pen.move_to(LEFT + BODY_WIDTH * 0.25, crossbar_y - STROKE_WIDTH / 2.0);
    pen.line_to(LEFT + BODY_WIDTH * 0.75, crossbar_y - STROKE_WIDTH / 2.0);
    pen.line_to(LEFT + BODY_WIDTH * 0.70, crossbar_y + STROKE_WIDTH / 2.0);
    pen.line_to(LEFT + BODY_WIDTH * 0.30, crossbar_y + STROKE_WIDTH / 2.0);
    pen.close();
}

/// I: a stem with rectangular serif blocks top and bottom.
pub fn draw_i(pen: &mut dyn OutlinePen) {
    let center_x = 150.0;
    let serif = 100.0;

    rectangle(
        pen,
        center_x - STROKE_WIDTH / 2.0,
        0.0,
        center_x + STROKE_WIDTH / 2.0,
        CAP_HEIGHT,
    );
    rectangle(
        pen,
        center_x - serif,
        CAP_HEIGHT - STROKE_WIDTH,
        center_x + serif,
        CAP_HEIGHT,
    );
    rectangle(pen, center_x - serif, 0.0, center_x + serif, STROKE_WIDTH);
}

/// Whitespace and the fallback glyph only reserve an advance.
pub fn draw_nothing(_pen: &mut dyn OutlinePen) {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::shape::{check_contours, CommandRecorder, PathCommand};
    use kurbo::Point;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record(draw: fn(&mut dyn OutlinePen)) -> Vec<PathCommand> {
        let mut pen = CommandRecorder::new();
        draw(&mut pen);
        pen.finish()
    }

    #[rstest]
    #[case::f(draw_f, 3)]
    #[case::u(draw_u, 1)]
    #[case::n(draw_n, 3)]
    #[case::d(draw_d, 3)]
    #[case::a(draw_a, 3)]
    #[case::i(draw_i, 3)]
    #[case::nothing(draw_nothing, 0)]
    fn contour_counts(#[case] draw: fn(&mut dyn OutlinePen), #[case] expected: usize) {
        assert_eq!(check_contours(&record(draw)), Ok(expected));
    }

    #[test]
    fn f_bars() {
        let commands = record(draw_f);
        assert_eq!(
            &commands[5..10],
            &[
                PathCommand::MoveTo(Point::new(100.0, 580.0)),
                PathCommand::LineTo(Point::new(500.0, 580.0)),
                PathCommand::LineTo(Point::new(500.0, 700.0)),
                PathCommand::LineTo(Point::new(100.0, 700.0)),
                PathCommand::ClosePath,
            ]
        );
        assert_eq!(commands[10], PathCommand::MoveTo(Point::new(100.0, 440.0)));
        assert_eq!(commands[12], PathCommand::LineTo(Point::new(450.0, 560.0)));
    }

    #[test]
    fn u_uses_the_tuned_handle_fractions() {
        let commands = record(draw_u);
        assert_eq!(commands.len(), 11);
        assert_eq!(commands[1], PathCommand::LineTo(Point::new(100.0, 300.0)));
        assert_eq!(
            commands[2],
            PathCommand::CurveTo(
                Point::new(100.0, 180.0 * 0.45),
                Point::new(100.0 + 180.0 * 0.45, 0.0),
                Point::new(280.0, 0.0)
            )
        );
        assert_eq!(
            commands[7],
            PathCommand::CurveTo(
                Point::new(580.0, 180.0 * 0.78),
                Point::new(280.0 + 180.0 * 0.22, 120.0),
                Point::new(280.0, 120.0)
            )
        );
        assert_eq!(commands[9], PathCommand::LineTo(Point::new(220.0, 700.0)));
    }

    #[test]
    fn d_lower_bowl_ends_on_the_baseline() {
        let commands = record(draw_d);
        let lower_start = commands
            .iter()
            .rposition(|c| matches!(c, PathCommand::MoveTo(_)))
            .unwrap();
        assert_eq!(commands[lower_start], PathCommand::MoveTo(Point::new(220.0, 120.0)));
        assert_eq!(
            commands[lower_start + 4],
            PathCommand::CurveTo(
                Point::new(700.0, 350.0 - 290.0 * 0.55),
                Point::new(390.0 + 290.0 * 0.55, 240.0),
                Point::new(390.0, 0.0)
            )
        );
    }

    #[test]
    fn a_crossbar() {
        let commands = record(draw_a);
        let bottom = 700.0 * 0.35 - 60.0;
        assert_eq!(
            &commands[10..],
            &[
                PathCommand::MoveTo(Point::new(250.0, bottom)),
                PathCommand::LineTo(Point::new(550.0, bottom)),
                PathCommand::LineTo(Point::new(520.0, 305.0)),
                PathCommand::LineTo(Point::new(280.0, 305.0)),
                PathCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn i_serifs() {
        let commands = record(draw_i);
        assert_eq!(commands[0], PathCommand::MoveTo(Point::new(90.0, 0.0)));
        assert_eq!(commands[5], PathCommand::MoveTo(Point::new(50.0, 580.0)));
        assert_eq!(commands[12], PathCommand::LineTo(Point::new(250.0, 120.0)));
    }

    #[test]
    fn nothing_draws_nothing() {
        assert!(record(draw_nothing).is_empty());
    }
}
