//! Planar geometry kernel for the synthesis pipeline.
//!
//! Everything operates on axis-agnostic polygons given as vertex lists in
//! feet. Outputs are always freshly allocated; nothing aliases its inputs.

#[cfg(test)]
mod test;

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Degeneracy tolerance, in feet. Segments shorter than this and cross
/// products smaller than this are treated as zero.
pub const EPSILON: f32 = 1e-3;

/// An axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Bounds { min, max }
    }

    /// Bounds of a rectangle anchored at its SW corner.
    pub fn from_origin_size(origin: Point, width: f32, depth: f32) -> Self {
        Bounds {
            min: origin,
            max: Point::new(origin.x + width, origin.y + depth),
        }
    }

    /// Smallest bounds containing every given point. None for an empty set.
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Bounds { min: first, max: first };
        for p in iter {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn depth(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f32 {
        self.width() * self.depth()
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(&self.max)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// AABB overlap test. `tolerance` shrinks both rectangles before the
    /// test, so touching edges (and overlaps up to `tolerance`) don't count.
    pub fn intersects(&self, other: &Bounds, tolerance: f32) -> bool {
        (self.max.x - tolerance) > other.min.x
            && (other.max.x - tolerance) > self.min.x
            && (self.max.y - tolerance) > other.min.y
            && (other.max.y - tolerance) > self.min.y
    }

    pub fn expand(&self, by: f32) -> Bounds {
        Bounds {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Corner vertices in CCW order starting from the SW corner.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// Distance from a point to this rectangle; 0 when inside.
    pub fn distance_to_point(&self, p: Point) -> f32 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// The wall segment two axis-aligned rectangles share, if their edges are
/// within `tolerance` of touching and the contact has positive length.
pub fn shared_wall(a: &Bounds, b: &Bounds, tolerance: f32) -> Option<(Point, Point)> {
    let x_lo = a.min.x.max(b.min.x);
    let x_hi = a.max.x.min(b.max.x);
    let y_lo = a.min.y.max(b.min.y);
    let y_hi = a.max.y.min(b.max.y);

    // Horizontal wall: x-extents overlap, edges meet in y.
    if x_hi - x_lo > EPSILON {
        if (a.max.y - b.min.y).abs() <= tolerance {
            let y = (a.max.y + b.min.y) / 2.0;
            return Some((Point::new(x_lo, y), Point::new(x_hi, y)));
        }
        if (b.max.y - a.min.y).abs() <= tolerance {
            let y = (b.max.y + a.min.y) / 2.0;
            return Some((Point::new(x_lo, y), Point::new(x_hi, y)));
        }
    }

    // Vertical wall: y-extents overlap, edges meet in x.
    if y_hi - y_lo > EPSILON {
        if (a.max.x - b.min.x).abs() <= tolerance {
            let x = (a.max.x + b.min.x) / 2.0;
            return Some((Point::new(x, y_lo), Point::new(x, y_hi)));
        }
        if (b.max.x - a.min.x).abs() <= tolerance {
            let x = (b.max.x + a.min.x) / 2.0;
            return Some((Point::new(x, y_lo), Point::new(x, y_hi)));
        }
    }

    None
}

/// Unsigned polygon area via the shoelace formula. Polygons with fewer than
/// 3 vertices have zero area.
pub fn polygon_area(polygon: &[Point]) -> f32 {
    signed_area(polygon).abs()
}

fn signed_area(polygon: &[Point]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

pub fn polygon_centroid(polygon: &[Point]) -> Point {
    if polygon.is_empty() {
        return Point::default();
    }
    let mut sum = Point::default();
    for p in polygon {
        sum += *p;
    }
    sum / polygon.len() as f32
}

/// Ray-casting point-in-polygon test. Casts a horizontal ray and counts
/// crossings; the strict-less comparison keeps vertices that lie exactly on
/// the ray from being counted twice.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Convex polygon overlap via the Separating Axis Theorem. Projects both
/// polygons onto every edge normal; a gap on any axis means no overlap.
/// Contact within EPSILON does not count as overlap, so polygons sharing an
/// edge are considered disjoint.
pub fn polygons_overlap(a: &[Point], b: &[Point]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    !has_separating_axis(a, b) && !has_separating_axis(b, a)
}

fn has_separating_axis(edges_of: &[Point], other: &[Point]) -> bool {
    for i in 0..edges_of.len() {
        let edge = edges_of[(i + 1) % edges_of.len()] - edges_of[i];
        if edge.length() < EPSILON {
            continue;
        }
        let axis = edge.perpendicular().normalized();
        let (a_min, a_max) = project(edges_of, axis);
        let (b_min, b_max) = project(other, axis);
        if a_max < b_min + EPSILON || b_max < a_min + EPSILON {
            return true;
        }
    }
    false
}

fn project(polygon: &[Point], axis: Point) -> (f32, f32) {
    let mut lo = f32::MAX;
    let mut hi = f32::MIN;
    for p in polygon {
        let d = p.dot(axis);
        lo = lo.min(d);
        hi = hi.max(d);
    }
    (lo, hi)
}

/// Intersection point of segments a1-a2 and b1-b2, or None when they are
/// parallel (cross product below EPSILON) or meet outside either segment.
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.cross(s);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (b1 - a1).cross(s) / denom;
    let u = (b1 - a1).cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a1 + r * t)
    } else {
        None
    }
}

/// Sutherland-Hodgman polygon clipping. The clip polygon must be convex;
/// the subject may have either winding. Returns the (possibly empty)
/// clipped polygon as a fresh vertex list.
pub fn sutherland_hodgman_clip(subject: &[Point], clip: &[Point]) -> Vec<Point> {
    if subject.len() < 3 || clip.len() < 3 {
        return Vec::new();
    }

    // Inside-ness depends on the clip polygon's winding.
    let orient = if signed_area(clip) >= 0.0 { 1.0 } else { -1.0 };
    let inside = |edge_a: Point, edge_b: Point, p: Point| -> bool {
        (edge_b - edge_a).cross(p - edge_a) * orient >= -EPSILON
    };

    let mut output: Vec<Point> = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let edge_a = clip[i];
        let edge_b = clip[(i + 1) % clip.len()];
        let input = std::mem::take(&mut output);

        for j in 0..input.len() {
            let current = input[j];
            let previous = input[(j + input.len() - 1) % input.len()];
            let current_in = inside(edge_a, edge_b, current);
            let previous_in = inside(edge_a, edge_b, previous);

            if current_in {
                if !previous_in {
                    if let Some(x) = line_intersection(previous, current, edge_a, edge_b) {
                        output.push(x);
                    }
                }
                output.push(current);
            } else if previous_in {
                if let Some(x) = line_intersection(previous, current, edge_a, edge_b) {
                    output.push(x);
                }
            }
        }
    }
    output
}

/// Intersection of segment p1-p2 with the infinite line through l1-l2.
fn line_intersection(p1: Point, p2: Point, l1: Point, l2: Point) -> Option<Point> {
    let r = p2 - p1;
    let s = l2 - l1;
    let denom = r.cross(s);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (l1 - p1).cross(s) / denom;
    Some(p1 + r * t)
}

/// Expands a centerline into a rectangle of the given width. Vertices come
/// back CCW. A degenerate centerline (shorter than EPSILON) yields a square
/// of side `width` centred on `start`.
pub fn perpendicular_offset(start: Point, end: Point, width: f32) -> [Point; 4] {
    let half = width / 2.0;
    let dir = end - start;
    if dir.length() < EPSILON {
        return [
            Point::new(start.x - half, start.y - half),
            Point::new(start.x + half, start.y - half),
            Point::new(start.x + half, start.y + half),
            Point::new(start.x - half, start.y + half),
        ];
    }
    let left = dir.normalized().perpendicular() * half;
    [start - left, end - left, end + left, start + left]
}
