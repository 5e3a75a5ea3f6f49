use crate::common::{Node, NodeType};
use serde::{Deserialize, Serialize};

/// A closed or open contour in a glyph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// A list of nodes in the path
    pub nodes: Vec<Node>,
    /// Whether the path is closed
    pub closed: bool,
}

impl Path {
    /// Converts the `Path` to a [`kurbo::BezPath`].
    pub fn to_kurbo(&self) -> Result<kurbo::BezPath, String> {
        let mut path = kurbo::BezPath::new();
        let mut offs: Vec<kurbo::Point> = Vec::with_capacity(2);
        let rotate = if self.closed {
            self.nodes
                .iter()
                .rev()
                .position(Node::is_on_curve)
                .map(|idx| self.nodes.len() - 1 - idx)
                .unwrap_or(0)
        } else {
            0
        };
        let mut nodes = self
            .nodes
            .iter()
            .cycle()
            .skip(rotate)
            .take(self.nodes.len());
        // All kurbo paths, even closed ones, must start with a move_to
        let start = nodes.next();
        if let Some(start) = start {
            path.move_to(start.to_kurbo());
        }
        for pt in nodes {
            let kurbo_point = pt.to_kurbo();
            match pt.nodetype {
                NodeType::Move => path.move_to(kurbo_point),
                NodeType::Line => path.line_to(kurbo_point),
                NodeType::OffCurve => offs.push(kurbo_point),
                NodeType::Curve => {
                    match offs.as_slice() {
                        [p1, p2] => path.curve_to(*p1, *p2, kurbo_point),
                        other => {
                            return Err(format!(
                                "curve to ({}, {}) has {} control points",
                                pt.x,
                                pt.y,
                                other.len()
                            ))
                        }
                    };
                    offs.clear();
                }
            }
        }
        // Control points left over belong to the curve closing onto the start
        if !offs.is_empty() {
            match (start, offs.as_slice()) {
                (Some(start), [p1, p2]) if self.closed && start.nodetype == NodeType::Curve => {
                    path.curve_to(*p1, *p2, start.to_kurbo())
                }
                _ => return Err(format!("{} dangling control points", offs.len())),
            }
        }
        if self.closed {
            path.close_path()
        }
        Ok(path)
    }
}

/// One drawing instruction, in absolute design units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(kurbo::Point),
    LineTo(kurbo::Point),
    CurveTo(kurbo::Point, kurbo::Point, kurbo::Point),
    ClosePath,
}

impl PathCommand {
    /// Issue this command again on another pen.
    pub fn replay(&self, pen: &mut dyn OutlinePen) {
        match *self {
            PathCommand::MoveTo(p) => pen.move_to(p.x, p.y),
            PathCommand::LineTo(p) => pen.line_to(p.x, p.y),
            PathCommand::CurveTo(c0, c1, p) => pen.curve_to(c0.x, c0.y, c1.x, c1.y, p.x, p.y),
            PathCommand::ClosePath => pen.close(),
        }
    }
}

/// Check that a command sequence is made only of complete contours: each
/// one opened by a move and terminated by an explicit close.
pub fn check_contours(commands: &[PathCommand]) -> Result<usize, String> {
    let mut open = false;
    let mut contours = 0;
    for (ix, command) in commands.iter().enumerate() {
        match (command, open) {
            (PathCommand::MoveTo(_), false) => open = true,
            (PathCommand::MoveTo(_), true) => {
                return Err(format!("command {ix}: move inside an unclosed contour"))
            }
            (PathCommand::ClosePath, true) => {
                open = false;
                contours += 1;
            }
            (_, false) => return Err(format!("command {ix}: drawing without a current point")),
            (_, true) => {}
        }
        let finite = match command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p.is_finite(),
            PathCommand::CurveTo(c0, c1, p) => c0.is_finite() && c1.is_finite() && p.is_finite(),
            PathCommand::ClosePath => true,
        };
        if !finite {
            return Err(format!("command {ix}: non-finite coordinate"));
        }
    }
    if open {
        return Err("final contour is not closed".to_string());
    }
    Ok(contours)
}

// This code stolen from Skrifa, in f64 so that design fractions survive.
/// Interface for accepting a sequence of path commands.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// A pen which records the commands it is given, verbatim
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<PathCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<PathCommand> {
        self.commands
    }
}

impl OutlinePen for CommandRecorder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.commands
            .push(PathCommand::MoveTo(kurbo::Point::new(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands
            .push(PathCommand::LineTo(kurbo::Point::new(x, y)));
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::CurveTo(
            kurbo::Point::new(cx0, cy0),
            kurbo::Point::new(cx1, cy1),
            kurbo::Point::new(x, y),
        ));
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::ClosePath);
    }
}

/// A pen which builds paths
///
/// ```rust
/// use fundaid_font::{OutlinePen, PathBuilder};
/// let mut pen = PathBuilder::new();
/// pen.move_to(0.0, 0.0);
/// pen.line_to(100.0, 0.0);
/// pen.line_to(100.0, 100.0);
/// pen.close();
/// let paths = pen.build();
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].nodes.len(), 3);
/// assert!(paths[0].closed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    paths: Vec<Path>,
    current_path: Option<Path>,
}

impl PathBuilder {
    /// Create a new PathBuilder
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            current_path: None,
        }
    }

    /// Build and return the paths
    pub fn build(self) -> Vec<Path> {
        if let Some(path) = self.current_path {
            let mut paths = self.paths;
            paths.push(path);
            return paths;
        }
        self.paths
    }

    fn current_path_mut(&mut self) -> &mut Path {
        self.current_path.get_or_insert_with(Path::default)
    }
}

impl OutlinePen for PathBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        // Start a new path if we have an existing one
        if let Some(path) = self.current_path.take() {
            self.paths.push(path);
        }
        self.current_path_mut().nodes.push(Node::new_move(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.current_path_mut().nodes.push(Node::new_line(x, y));
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        let path = self.current_path_mut();
        path.nodes.push(Node::new_offcurve(cx0, cy0));
        path.nodes.push(Node::new_offcurve(cx1, cy1));
        path.nodes.push(Node::new_curve(x, y));
    }

    fn close(&mut self) {
        let Some(mut path) = self.current_path.take() else {
            return;
        };
        path.closed = true;
        // A closed path has no move. If the final node brought us back to
        // the start point, drop the first node; otherwise it becomes a line.
        let returns_to_start = match (path.nodes.first(), path.nodes.last()) {
            (Some(first), Some(last)) => {
                path.nodes.len() > 1 && first.x == last.x && first.y == last.y
            }
            _ => false,
        };
        if returns_to_start {
            path.nodes.remove(0);
        } else if let Some(first_node) = path.nodes.first_mut() {
            first_node.nodetype = NodeType::Line;
        }
        self.paths.push(path);
    }
}
