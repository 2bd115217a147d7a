//! Shape taxonomy and shared shape handles
//!
//! Every piece of world geometry is a [`Shape`]: an identity (id + tags)
//! plus one of a closed set of [`ShapeKind`]s. Shapes are shared through
//! [`ShapeHandle`]s so the same shape can sit in the spatial index and in one
//! or more [`Space`]s at once; equality is by reference, never by value.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::slope::{Slope, SlopePlatform};
use super::space::Space;
use crate::events::MessageManager;
use crate::foundation::ids::{IdGenerator, ShapeId};
use crate::foundation::math::{Rect, Vec2};
use crate::physics::tags::{Tag, Tags};
use crate::physics::zone::Zone;

/// Identifier and tags carried by every shape
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeIdentity {
    id: ShapeId,
    tags: Tags,
}

impl ShapeIdentity {
    /// New identity without tags
    pub fn new(id: ShapeId) -> Self {
        Self { id, tags: Tags::new() }
    }

    /// Identifier
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Tags set directly on this shape
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Mutable tag access
    pub fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }
}

/// Geometry variants
#[derive(Debug)]
pub enum ShapeKind {
    /// Solid axis-aligned box
    Rectangle(Rect),
    /// Walkable line
    Slope(Slope),
    /// One-way box that only stops bodies falling onto it from above
    Platform(Rect),
    /// Slope with flat landing lines on both ends
    SlopePlatform(SlopePlatform),
    /// Non-blocking trigger box
    Zone(Zone),
    /// Ordered group of shapes
    Space(Space),
}

impl ShapeKind {
    /// Variant name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle(_) => "rectangle",
            Self::Slope(_) => "slope",
            Self::Platform(_) => "platform",
            Self::SlopePlatform(_) => "slope_platform",
            Self::Zone(_) => "zone",
            Self::Space(_) => "space",
        }
    }
}

/// A uniquely identified piece of geometry
#[derive(Debug)]
pub struct Shape {
    identity: ShapeIdentity,
    kind: ShapeKind,
}

impl Shape {
    /// Wrap geometry with an identity
    pub fn new(identity: ShapeIdentity, kind: ShapeKind) -> Self {
        Self { identity, kind }
    }

    /// Identifier, fixed for the shape's lifetime
    pub fn id(&self) -> ShapeId {
        self.identity.id
    }

    /// Geometry
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Mutable geometry
    pub fn kind_mut(&mut self) -> &mut ShapeKind {
        &mut self.kind
    }

    /// The group, if this shape is a [`Space`]
    pub fn as_space(&self) -> Option<&Space> {
        match &self.kind {
            ShapeKind::Space(space) => Some(space),
            _ => None,
        }
    }

    /// Mutable group access
    pub fn as_space_mut(&mut self) -> Option<&mut Space> {
        match &mut self.kind {
            ShapeKind::Space(space) => Some(space),
            _ => None,
        }
    }

    /// Tags of this shape. For a space, the union of its own and every member's tags.
    pub fn tags(&self) -> Tags {
        match &self.kind {
            ShapeKind::Space(space) => space.member_tags().union(&self.identity.tags),
            _ => self.identity.tags.clone(),
        }
    }

    /// True if every requested tag is in [`tags`](Self::tags)
    pub fn has_tags(&self, tags: &[Tag]) -> bool {
        match &self.kind {
            ShapeKind::Space(_) => self.tags().has_all(tags),
            _ => self.identity.tags.has_all(tags),
        }
    }

    /// Add tags. A space also tags all of its members.
    pub fn add_tags(&mut self, tags: &[Tag]) {
        self.identity.tags.add(tags);
        if let ShapeKind::Space(space) = &self.kind {
            for member in space.members() {
                member.borrow_mut().add_tags(tags);
            }
        }
    }

    /// Remove tags. A space also untags all of its members.
    pub fn remove_tags(&mut self, tags: &[Tag]) {
        self.identity.tags.remove(tags);
        if let ShapeKind::Space(space) = &self.kind {
            for member in space.members() {
                member.borrow_mut().remove_tags(tags);
            }
        }
    }

    /// Remove every tag. A space also clears its members.
    pub fn clear_tags(&mut self) {
        self.identity.tags.clear();
        if let ShapeKind::Space(space) = &self.kind {
            for member in space.members() {
                member.borrow_mut().clear_tags();
            }
        }
    }

    /// Axis-aligned bounding box
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ShapeKind::Rectangle(rect) | ShapeKind::Platform(rect) => *rect,
            ShapeKind::Zone(zone) => zone.rect(),
            ShapeKind::Slope(slope) => slope.bounds(),
            ShapeKind::SlopePlatform(platform) => platform.bounds(),
            ShapeKind::Space(space) => space.bounds(),
        }
    }

    /// Min corner of the bounds
    pub fn position(&self) -> Vec2 {
        self.bounds().position()
    }

    /// Max corner of the bounds
    pub fn max_position(&self) -> Vec2 {
        self.bounds().max_position()
    }

    /// Width of the bounds
    pub fn width(&self) -> f32 {
        self.bounds().width
    }

    /// Height of the bounds
    pub fn height(&self) -> f32 {
        self.bounds().height
    }

    /// Center of the bounds; for slopes, the midpoint of the line
    pub fn center(&self) -> Vec2 {
        match &self.kind {
            ShapeKind::Slope(slope) => slope.center(),
            _ => self.bounds().center(),
        }
    }

    /// Move by a delta. Spaces move every member.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        match &mut self.kind {
            ShapeKind::Rectangle(rect) | ShapeKind::Platform(rect) => rect.translate(dx, dy),
            ShapeKind::Zone(zone) => zone.translate(dx, dy),
            ShapeKind::Slope(slope) => slope.translate(dx, dy),
            ShapeKind::SlopePlatform(platform) => platform.translate(dx, dy),
            ShapeKind::Space(space) => space.translate(dx, dy),
        }
    }

    /// Move so the min corner lands on `(x, y)`.
    ///
    /// A space instead moves every member by the offset that puts its first
    /// member at `(x, y)`; an empty space does nothing.
    pub fn set_position(&mut self, x: f32, y: f32) {
        let anchor = match &self.kind {
            ShapeKind::Space(space) => match space.first_position() {
                Some(position) => position,
                None => return,
            },
            _ => self.position(),
        };
        self.translate(x - anchor.x, y - anchor.y);
    }

    /// Narrow overlap test against a box
    pub fn overlaps(&self, rect: &Rect) -> bool {
        match &self.kind {
            ShapeKind::Rectangle(own) | ShapeKind::Platform(own) => own.overlaps(rect),
            ShapeKind::Zone(zone) => zone.rect().overlaps(rect),
            ShapeKind::Slope(slope) => slope.overlaps(rect),
            ShapeKind::SlopePlatform(platform) => platform.overlaps(rect),
            ShapeKind::Space(space) => space.overlaps(rect),
        }
    }
}

/// Shared reference to a [`Shape`]
///
/// Cloning a handle shares the shape. The id is cached so identity checks
/// never need to borrow.
#[derive(Clone)]
pub struct ShapeHandle {
    id: ShapeId,
    inner: Rc<RefCell<Shape>>,
}

impl ShapeHandle {
    /// Take ownership of a shape
    pub fn new(shape: Shape) -> Self {
        Self {
            id: shape.id(),
            inner: Rc::new(RefCell::new(shape)),
        }
    }

    /// Identifier of the referenced shape
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Borrow the shape.
    ///
    /// # Panics
    /// If the shape is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Shape> {
        self.inner.borrow()
    }

    /// Mutably borrow the shape.
    ///
    /// # Panics
    /// If the shape is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Shape> {
        self.inner.borrow_mut()
    }

    /// True if both handles point at the same shape
    pub fn ptr_eq(&self, other: &ShapeHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Address of the shared shape, equal for every clone of this handle.
    /// Only meaningful while some handle keeps the shape alive.
    pub fn address(&self) -> *const () {
        Rc::as_ptr(&self.inner).cast()
    }

    /// Bounding box of the referenced shape
    pub fn bounds(&self) -> Rect {
        self.borrow().bounds()
    }

    /// See [`Shape::tags`]
    pub fn tags(&self) -> Tags {
        self.borrow().tags()
    }

    /// See [`Shape::has_tags`]
    pub fn has_tags(&self, tags: &[Tag]) -> bool {
        self.borrow().has_tags(tags)
    }

    /// See [`Shape::add_tags`]
    pub fn add_tags(&self, tags: &[Tag]) {
        self.borrow_mut().add_tags(tags);
    }

    /// See [`Shape::remove_tags`]
    pub fn remove_tags(&self, tags: &[Tag]) {
        self.borrow_mut().remove_tags(tags);
    }

    /// See [`Shape::clear_tags`]
    pub fn clear_tags(&self) {
        self.borrow_mut().clear_tags();
    }

    /// See [`Shape::translate`]
    pub fn translate(&self, dx: f32, dy: f32) {
        self.borrow_mut().translate(dx, dy);
    }

    /// See [`Shape::set_position`]
    pub fn set_position(&self, x: f32, y: f32) {
        self.borrow_mut().set_position(x, y);
    }

    /// See [`Shape::overlaps`]
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.borrow().overlaps(rect)
    }
}

impl PartialEq for ShapeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ShapeHandle {}

impl fmt::Debug for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(shape) => write!(f, "ShapeHandle({} {})", shape.kind().name(), self.id),
            Err(_) => write!(f, "ShapeHandle({} <borrowed>)", self.id),
        }
    }
}

/// Builds shapes with ids from a single generator
#[derive(Debug, Clone, Default)]
pub struct ShapeFactory {
    ids: Arc<IdGenerator>,
}

impl ShapeFactory {
    /// Factory with its own generator; ids stay unique across factories
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory drawing ids from a shared generator
    pub fn with_generator(ids: Arc<IdGenerator>) -> Self {
        Self { ids }
    }

    /// The generator ids are drawn from
    pub fn generator(&self) -> &Arc<IdGenerator> {
        &self.ids
    }

    /// Wrap any geometry in a new shape
    pub fn shape(&self, kind: ShapeKind) -> ShapeHandle {
        let identity = ShapeIdentity::new(self.ids.next_id());
        log::trace!("Created {} {}", kind.name(), identity.id());
        ShapeHandle::new(Shape::new(identity, kind))
    }

    /// Solid box
    pub fn rectangle(&self, x: f32, y: f32, width: f32, height: f32) -> ShapeHandle {
        self.shape(ShapeKind::Rectangle(Rect::new(x, y, width, height)))
    }

    /// One-way platform
    pub fn platform(&self, x: f32, y: f32, width: f32, height: f32) -> ShapeHandle {
        self.shape(ShapeKind::Platform(Rect::new(x, y, width, height)))
    }

    /// Line from `p1` to `p2`
    pub fn slope(&self, p1: Vec2, p2: Vec2) -> ShapeHandle {
        self.shape(ShapeKind::Slope(Slope::new(p1, p2)))
    }

    /// Slope with landing lines of `landing_width` on both ends
    pub fn slope_platform(&self, p1: Vec2, p2: Vec2, landing_width: f32) -> ShapeHandle {
        self.shape(ShapeKind::SlopePlatform(SlopePlatform::new(p1, p2, landing_width)))
    }

    /// Trigger box publishing `message_type` through `mailbox`
    pub fn zone(
        &self,
        rect: Rect,
        mailbox: Arc<MessageManager>,
        message_type: impl Into<String>,
    ) -> ShapeHandle {
        self.shape(ShapeKind::Zone(Zone::new(rect, mailbox, message_type)))
    }

    /// Group of existing shapes
    pub fn space(&self, members: Vec<ShapeHandle>) -> ShapeHandle {
        self.shape(ShapeKind::Space(Space::from_members(members)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let factory = ShapeFactory::new();
        let a = factory.rectangle(0.0, 0.0, 1.0, 1.0);
        let b = factory.slope(Vec2::zeros(), Vec2::new(1.0, 1.0));
        let c = factory.space(vec![a.clone()]);

        assert!(a.id() < b.id());
        assert!(b.id() < c.id());
    }

    #[test]
    fn test_ids_unique_across_factories() {
        let world = ShapeFactory::new();
        let other_world = ShapeFactory::new();

        let ground = world.rectangle(0.0, 0.0, 1.0, 1.0);
        let body = other_world.rectangle(0.0, 0.0, 1.0, 1.0);
        assert_ne!(ground.id(), body.id());
    }

    #[test]
    fn test_address_follows_identity() {
        let factory = ShapeFactory::new();
        let a = factory.rectangle(0.0, 0.0, 1.0, 1.0);
        let b = factory.rectangle(0.0, 0.0, 1.0, 1.0);

        assert_eq!(a.address(), a.clone().address());
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn test_shared_generator() {
        let ids = Arc::new(IdGenerator::new());
        let left = ShapeFactory::with_generator(Arc::clone(&ids));
        let right = ShapeFactory::with_generator(Arc::clone(&ids));

        let a = left.rectangle(0.0, 0.0, 1.0, 1.0);
        let b = right.rectangle(0.0, 0.0, 1.0, 1.0);
        assert_ne!(a.id(), b.id());
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_handle_equality_is_identity() {
        let factory = ShapeFactory::new();
        let a = factory.rectangle(0.0, 0.0, 1.0, 1.0);
        let twin = factory.rectangle(0.0, 0.0, 1.0, 1.0);

        assert_eq!(a, a.clone());
        assert_ne!(a, twin);
    }

    #[test]
    fn test_translate_and_set_position() {
        let factory = ShapeFactory::new();
        let rect = factory.rectangle(10.0, 10.0, 4.0, 2.0);

        rect.translate(1.0, -2.0);
        assert_eq!(rect.bounds(), Rect::new(11.0, 8.0, 4.0, 2.0));

        rect.set_position(0.0, 0.0);
        assert_eq!(rect.bounds(), Rect::new(0.0, 0.0, 4.0, 2.0));

        let slope = factory.slope(Vec2::new(0.0, 10.0), Vec2::new(10.0, 0.0));
        slope.set_position(5.0, 5.0);
        let borrowed = slope.borrow();
        let ShapeKind::Slope(line) = borrowed.kind() else {
            panic!("expected a slope");
        };
        assert_eq!(line.points(), (Vec2::new(5.0, 15.0), Vec2::new(15.0, 5.0)));
    }

    #[test]
    fn test_tags_on_plain_shape() {
        let factory = ShapeFactory::new();
        let ground = factory.rectangle(0.0, 0.0, 10.0, 1.0);

        ground.add_tags(&[Tag::Ground, Tag::Collision]);
        assert!(ground.has_tags(&[Tag::Ground]));

        ground.remove_tags(&[Tag::Ground]);
        assert!(!ground.has_tags(&[Tag::Ground]));
        assert!(ground.has_tags(&[Tag::Collision]));

        ground.clear_tags();
        assert!(ground.tags().is_empty());
    }

    #[test]
    fn test_overlaps_dispatches_on_kind() {
        let factory = ShapeFactory::new();
        let probe = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert!(factory.platform(5.0, 5.0, 10.0, 1.0).overlaps(&probe));
        assert!(factory.slope(Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0)).overlaps(&probe));
        assert!(!factory.rectangle(10.0, 0.0, 5.0, 5.0).overlaps(&probe));
    }
}
