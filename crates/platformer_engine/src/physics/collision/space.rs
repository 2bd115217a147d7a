//! Ordered groups of shapes

use super::shape::ShapeHandle;
use crate::foundation::math::{Rect, Vec2};
use crate::physics::tags::{Tag, Tags};

/// Ordered, mutable collection of shape references.
///
/// Members are shared, not copied: moving a space moves the very shapes the
/// spatial index holds. A space may contain other spaces but must not contain
/// itself, directly or through a nested space.
#[derive(Debug, Default)]
pub struct Space {
    members: Vec<ShapeHandle>,
}

impl Space {
    /// Empty space
    pub fn new() -> Self {
        Self::default()
    }

    /// Space over the given members, in order
    pub fn from_members(members: Vec<ShapeHandle>) -> Self {
        Self { members }
    }

    /// Members in insertion order
    pub fn members(&self) -> &[ShapeHandle] {
        &self.members
    }

    /// Append shapes; no uniqueness check
    pub fn add(&mut self, shapes: impl IntoIterator<Item = ShapeHandle>) {
        self.members.extend(shapes);
    }

    /// Remove every reference to `shape`
    pub fn remove(&mut self, shape: &ShapeHandle) {
        self.members.retain(|member| !member.ptr_eq(shape));
    }

    /// Drop all members
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when there are no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if `shape` is a direct member
    pub fn contains(&self, shape: &ShapeHandle) -> bool {
        self.members.iter().any(|member| member.ptr_eq(shape))
    }

    /// Union of member bounds; an empty space has empty bounds at the origin
    pub fn bounds(&self) -> Rect {
        self.members
            .iter()
            .map(ShapeHandle::bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
            .unwrap_or_default()
    }

    /// Min corner of the first member
    pub fn first_position(&self) -> Option<Vec2> {
        self.members.first().map(|member| member.bounds().position())
    }

    /// Move every member
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for member in &self.members {
            member.translate(dx, dy);
        }
    }

    /// True if any member overlaps the box
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.members.iter().any(|member| member.overlaps(rect))
    }

    /// Union of member tags
    pub fn member_tags(&self) -> Tags {
        self.members
            .iter()
            .fold(Tags::new(), |acc, member| acc.union(&member.tags()))
    }

    /// Members accepted by `predicate`, as references to the same shapes
    pub fn filter(&self, predicate: impl Fn(&ShapeHandle) -> bool) -> Space {
        Space::from_members(self.members.iter().filter(|m| predicate(m)).cloned().collect())
    }

    /// Members carrying all of `tags`
    pub fn filter_by_tags(&self, tags: &[Tag]) -> Space {
        self.filter(|member| member.has_tags(tags))
    }

    /// Members missing at least one of `tags`
    pub fn filter_out_by_tags(&self, tags: &[Tag]) -> Space {
        self.filter(|member| !member.has_tags(tags))
    }
}
