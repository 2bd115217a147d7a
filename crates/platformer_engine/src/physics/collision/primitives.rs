//! Primitive line geometry and intersection algorithms
//!
//! Provides the directed segment used by slopes and the rectangle edge
//! decomposition used to intersect slopes against boxes.

use crate::foundation::ids::ShapeId;
use crate::foundation::math::{distance, Rect, Vec2};

/// Tolerance on the segment parameters, so intersections landing exactly on
/// an endpoint (a box corner, the joint between a slope and its landing zone)
/// are still reported despite float rounding.
pub const INTERSECTION_EPSILON: f32 = 1.0e-4;

/// A directed line segment from `p1` to `p2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point
    pub p1: Vec2,
    /// End point
    pub p2: Vec2,
}

impl Segment {
    /// Creates a segment between two points
    pub const fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    /// `p2 - p1`
    pub fn delta(&self) -> Vec2 {
        self.p2 - self.p1
    }

    /// Euclidean length
    pub fn length(&self) -> f32 {
        distance(self.p1, self.p2)
    }

    /// Midpoint
    pub fn center(&self) -> Vec2 {
        self.p1 + self.delta() * 0.5
    }

    /// Axis-aligned box spanned by both endpoints
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.p1.inf(&self.p2), self.p1.sup(&self.p2))
    }

    /// Translate both endpoints
    pub fn translate(&mut self, dx: f32, dy: f32) {
        let offset = Vec2::new(dx, dy);
        self.p1 += offset;
        self.p2 += offset;
    }

    /// Intersection point with another segment, if any.
    ///
    /// Solves `p1 + λ·d = q1 + γ·e` with a 2×2 determinant. Parallel and
    /// collinear segments (determinant exactly zero) never intersect.
    /// Both parameters are accepted on `[0, 1]` widened by
    /// [`INTERSECTION_EPSILON`], so shared endpoints count.
    pub fn intersection(&self, other: &Segment) -> Option<Vec2> {
        let d = self.delta();
        let e = other.delta();

        let det = d.x * e.y - e.x * d.y;
        if det == 0.0 {
            return None;
        }

        let w = self.p1 - other.p1;
        let lambda = (w.y * e.x - w.x * e.y) / det;
        let gamma = (w.y * d.x - w.x * d.y) / det;

        let in_range = |t: f32| (-INTERSECTION_EPSILON..=1.0 + INTERSECTION_EPSILON).contains(&t);
        if in_range(lambda) && in_range(gamma) {
            Some(self.p1 + d * lambda)
        } else {
            None
        }
    }

    /// The four edges of a rectangle in order: left, bottom, right, top
    pub fn edges_of(rect: &Rect) -> [Segment; 4] {
        let [top_left, bottom_left, bottom_right, top_right] = rect_corners(rect);
        [
            Segment::new(top_left, bottom_left),
            Segment::new(bottom_left, bottom_right),
            Segment::new(bottom_right, top_right),
            Segment::new(top_right, top_left),
        ]
    }
}

/// Corners walked so consecutive pairs form the left, bottom, right and top edges
fn rect_corners(rect: &Rect) -> [Vec2; 4] {
    let min = rect.position();
    let max = rect.max_position();
    [
        min,
        Vec2::new(min.x, max.y),
        max,
        Vec2::new(max.x, min.y),
    ]
}

/// A point where a slope crosses another shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPoint {
    /// World position of the crossing
    pub point: Vec2,
    /// Shape that was crossed, when the query targeted a shape
    pub shape: Option<ShapeId>,
}

impl IntersectionPoint {
    /// Point with no associated shape
    pub const fn at(point: Vec2) -> Self {
        Self { point, shape: None }
    }

    /// Point on the outline of `shape`
    pub const fn on(point: Vec2, shape: ShapeId) -> Self {
        Self {
            point,
            shape: Some(shape),
        }
    }
}

/// Order intersection points nearest-first relative to `origin`
pub fn sort_by_distance(points: &mut [IntersectionPoint], origin: Vec2) {
    points.sort_by(|a, b| distance(origin, a.point).total_cmp(&distance(origin, b.point)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_crossing_segments() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        let b = Segment::new(Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0));

        let hit = a.intersection(&b).expect("segments cross");
        assert_relative_eq!(hit.x, 1.0);
        assert_relative_eq!(hit.y, 0.0);
    }

    #[test]
    fn test_parallel_segments_never_intersect() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        let b = Segment::new(Vec2::new(0.0, 1.0), Vec2::new(4.0, 1.0));
        let collinear = Segment::new(Vec2::new(1.0, 0.0), Vec2::new(3.0, 0.0));

        assert!(a.intersection(&b).is_none());
        assert!(a.intersection(&collinear).is_none());
    }

    #[test]
    fn test_shared_endpoint_counts() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = Segment::new(Vec2::new(2.0, 2.0), Vec2::new(4.0, 0.0));

        let hit = a.intersection(&b).expect("endpoint shared");
        assert_relative_eq!(hit.x, 2.0, epsilon = 1e-4);
        assert_relative_eq!(hit.y, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_segments_short_of_each_other() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let b = Segment::new(Vec2::new(2.0, -1.0), Vec2::new(2.0, 1.0));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_rect_edges_order() {
        let edges = Segment::edges_of(&Rect::new(10.0, 20.0, 4.0, 6.0));

        // left runs down the min-x side, top runs along the min-y side
        assert_eq!(edges[0].p1, Vec2::new(10.0, 20.0));
        assert_eq!(edges[0].p2, Vec2::new(10.0, 26.0));
        assert_eq!(edges[1].p2, Vec2::new(14.0, 26.0));
        assert_eq!(edges[2].p2, Vec2::new(14.0, 20.0));
        assert_eq!(edges[3].p2, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_sort_nearest_first() {
        let mut points = vec![
            IntersectionPoint::at(Vec2::new(5.0, 0.0)),
            IntersectionPoint::at(Vec2::new(1.0, 0.0)),
            IntersectionPoint::at(Vec2::new(3.0, 0.0)),
        ];
        sort_by_distance(&mut points, Vec2::zeros());

        let xs: Vec<f32> = points.iter().map(|p| p.point.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0]);
    }
}
