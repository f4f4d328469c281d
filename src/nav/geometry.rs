//! Pixel geometry of focusable elements and the directional distance metric.

use super::Direction;

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Edge midpoints and corners of an element's page box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    pub left: Point,
    pub top: Point,
    pub right: Point,
    pub bottom: Point,
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
    pub width: f32,
    pub height: f32,
}

impl ElementGeometry {
    /// Derive all eight points from the page offset and size.
    pub fn from_box(x: f32, y: f32, width: f32, height: f32) -> Self {
        let x_half = width * 0.5;
        let y_half = height * 0.5;
        Self {
            left: Point::new(x, y + y_half),
            top: Point::new(x + x_half, y),
            right: Point::new(x + width, y + y_half),
            bottom: Point::new(x + x_half, y + height),
            top_left: Point::new(x, y),
            top_right: Point::new(x + width, y),
            bottom_left: Point::new(x, y + height),
            bottom_right: Point::new(x + width, y + height),
            width,
            height,
        }
    }

    /// Edge midpoint a query in `dir` starts from.
    pub fn exit_point(&self, dir: Direction) -> Point {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.top,
            Direction::Down => self.bottom,
        }
    }

    /// Corner pair of the edge that faces a query arriving from `dir`.
    /// The pair is ordered so the first point has the smaller coordinate
    /// along the edge.
    pub fn entry_edge(&self, dir: Direction) -> (Point, Point) {
        match dir {
            Direction::Left => (self.top_right, self.bottom_right),
            Direction::Right => (self.top_left, self.bottom_left),
            Direction::Up => (self.bottom_left, self.bottom_right),
            Direction::Down => (self.top_left, self.top_right),
        }
    }

    /// Half-plane test: is `self` positioned in direction `dir` from `from`?
    ///
    /// A candidate whose facing edge crosses the origin's exit edge is not
    /// a neighbor in that direction.
    pub fn lies_toward(&self, from: &ElementGeometry, dir: Direction) -> bool {
        match dir {
            Direction::Left => self.right.x <= from.left.x,
            Direction::Right => self.left.x >= from.right.x,
            Direction::Up => self.bottom.y <= from.top.y,
            Direction::Down => self.top.y >= from.bottom.y,
        }
    }
}

/// Distance from `point` to the edge `start..end`.
///
/// When the point's coordinate along the edge falls inside the edge's span
/// the distance is the straight orthogonal gap; otherwise it is the
/// Euclidean distance to the nearer corner.
pub fn edge_distance(point: Point, start: Point, end: Point, vertical: bool) -> f32 {
    let (p, s, e) = if vertical {
        (point.y, start.y, end.y)
    } else {
        (point.x, start.x, end.x)
    };
    if p < s {
        point.distance_to(start)
    } else if p <= e {
        if vertical {
            (start.x - point.x).abs()
        } else {
            (start.y - point.y).abs()
        }
    } else {
        point.distance_to(end)
    }
}

/// Directional distance from `from` to candidate `to` when moving `dir`.
pub fn directional_distance(from: &ElementGeometry, to: &ElementGeometry, dir: Direction) -> f32 {
    let (start, end) = to.entry_edge(dir);
    edge_distance(from.exit_point(dir), start, end, dir.is_horizontal())
}
