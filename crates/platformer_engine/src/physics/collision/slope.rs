//! Line-segment slopes and the composite slope platform

use serde::{Deserialize, Serialize};

use super::primitives::{sort_by_distance, IntersectionPoint, Segment};
use super::shape::{Shape, ShapeKind};
use crate::foundation::ids::ShapeId;
use crate::foundation::math::{Rect, Vec2};

/// A directed walkable line from `p1` to `p2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slope {
    p1: Vec2,
    p2: Vec2,
}

impl Slope {
    /// Creates a slope between two points
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    /// Both endpoints
    pub fn points(&self) -> (Vec2, Vec2) {
        (self.p1, self.p2)
    }

    /// `p2 - p1`
    pub fn delta(&self) -> Vec2 {
        self.segment().delta()
    }

    /// Length of the line
    pub fn length(&self) -> f32 {
        self.segment().length()
    }

    /// Midpoint of the line
    pub fn center(&self) -> Vec2 {
        self.segment().center()
    }

    /// Axis-aligned box spanned by the endpoints. Horizontal slopes have zero height.
    pub fn bounds(&self) -> Rect {
        self.segment().bounds()
    }

    /// Move both endpoints
    pub fn translate(&mut self, dx: f32, dy: f32) {
        let offset = Vec2::new(dx, dy);
        self.p1 += offset;
        self.p2 += offset;
    }

    /// The slope as a plain segment
    pub fn segment(&self) -> Segment {
        Segment::new(self.p1, self.p2)
    }

    /// Crossing with another slope, if any
    pub fn intersection(&self, other: &Slope) -> Option<IntersectionPoint> {
        self.segment().intersection(&other.segment()).map(IntersectionPoint::at)
    }

    /// Crossings with the given segments, nearest to `p1` first
    pub fn intersections_with_segments(&self, segments: &[Segment]) -> Vec<IntersectionPoint> {
        let line = self.segment();
        let mut points: Vec<IntersectionPoint> = segments
            .iter()
            .filter_map(|segment| line.intersection(segment))
            .map(IntersectionPoint::at)
            .collect();
        sort_by_distance(&mut points, self.p1);
        points
    }

    /// Crossings with all four edges of a rectangle, nearest to `p1` first
    pub fn intersections_with_rect(&self, rect: &Rect) -> Vec<IntersectionPoint> {
        self.intersections_with_segments(&Segment::edges_of(rect))
    }

    /// Crossings with any shape, nearest to `p1` first.
    ///
    /// Each point carries the id of the shape whose outline was crossed.
    /// Spaces are searched through all of their members, nested ones included.
    pub fn intersections_with_shape(&self, shape: &Shape) -> Vec<IntersectionPoint> {
        let mut points = Vec::new();
        self.collect_intersections(shape, &mut points);
        sort_by_distance(&mut points, self.p1);
        points
    }

    fn collect_intersections(&self, shape: &Shape, points: &mut Vec<IntersectionPoint>) {
        let id = shape.id();
        match shape.kind() {
            ShapeKind::Rectangle(rect) | ShapeKind::Platform(rect) => {
                self.push_crossings(&Segment::edges_of(rect), id, points);
            }
            ShapeKind::Zone(zone) => {
                self.push_crossings(&Segment::edges_of(&zone.rect()), id, points);
            }
            ShapeKind::Slope(slope) => self.push_crossings(&[slope.segment()], id, points),
            ShapeKind::SlopePlatform(platform) => {
                let segments = platform.parts().map(Slope::segment);
                self.push_crossings(&segments, id, points);
            }
            ShapeKind::Space(space) => {
                for member in space.members() {
                    self.collect_intersections(&member.borrow(), points);
                }
            }
        }
    }

    fn push_crossings(&self, segments: &[Segment], id: ShapeId, points: &mut Vec<IntersectionPoint>) {
        let line = self.segment();
        points.extend(
            segments
                .iter()
                .filter_map(|segment| line.intersection(segment))
                .map(|point| IntersectionPoint::on(point, id)),
        );
    }

    /// True if the line crosses the rectangle's boundary or either endpoint
    /// lies inside it (half-open on the max sides)
    pub fn overlaps(&self, rect: &Rect) -> bool {
        !self.intersections_with_rect(rect).is_empty()
            || rect.contains_point(self.p1)
            || rect.contains_point(self.p2)
    }
}

/// A slope with flat landing lines on both ends.
///
/// ```text
///             ___ landing zone 2
///           /
///         /  slope
///       /
///   ___ landing zone 1
/// ```
///
/// The lower landing line catches bodies walking in along the ground before
/// they have any downward velocity; the upper one lifts bodies over the apex
/// so they land on whatever continues past it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopePlatform {
    landing_zone1: Slope,
    landing_zone2: Slope,
    slope: Slope,
}

impl SlopePlatform {
    /// `p1` is the left end of the slope and `p2` the right end.
    /// `landing_width` is the horizontal length of each landing line.
    pub fn new(p1: Vec2, p2: Vec2, landing_width: f32) -> Self {
        Self {
            landing_zone1: Slope::new(Vec2::new(p1.x - landing_width, p1.y), p1),
            landing_zone2: Slope::new(p2, Vec2::new(p2.x + landing_width, p2.y)),
            slope: Slope::new(p1, p2),
        }
    }

    /// Left and right landing lines
    pub fn landing_zones(&self) -> (&Slope, &Slope) {
        (&self.landing_zone1, &self.landing_zone2)
    }

    /// The diagonal itself
    pub fn slope(&self) -> &Slope {
        &self.slope
    }

    /// Landing zone 1, landing zone 2, then the main slope
    pub fn parts(&self) -> [&Slope; 3] {
        [&self.landing_zone1, &self.landing_zone2, &self.slope]
    }

    /// Union of the three lines' bounds
    pub fn bounds(&self) -> Rect {
        self.landing_zone1
            .bounds()
            .union(&self.landing_zone2.bounds())
            .union(&self.slope.bounds())
    }

    /// Move all three lines
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.landing_zone1.translate(dx, dy);
        self.landing_zone2.translate(dx, dy);
        self.slope.translate(dx, dy);
    }

    /// True if any of the three lines overlaps the rectangle
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.parts().iter().any(|part| part.overlaps(rect))
    }
}
