//! Per-frame collision resolution
//!
//! Movement is resolved one axis at a time against the shapes the spatial
//! index returns for each hitbox. Solid contacts trim the velocity so the
//! hitbox stops flush with the surface instead of passing into it.
//!
//! Within one frame, the first rectangle or platform touched on an axis wins
//! that axis: later candidates on the same axis are ignored, in index
//! iteration order. Slopes are evaluated whenever they overlap and override
//! whatever was resolved before them.

use std::sync::Arc;

use bitflags::bitflags;

use super::body::Body;
use super::collision::{Segment, ShapeHandle, ShapeKind, Slope, SlopePlatform};
use super::zone::ZoneMessage;
use crate::events::{Message, MessageManager};
use crate::foundation::math::{Rect, Vec2};

bitflags! {
    /// Axes already settled by a contact this frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResolvedAxes: u8 {
        /// Horizontal contact made
        const X = 1 << 0;
        /// Vertical contact made
        const Y = 1 << 1;
    }
}

/// Boxes for one hitbox, computed from the velocity at the hitbox's turn
#[derive(Debug, Clone, Copy)]
struct Sweep {
    collider: Rect,
    moved_x: Rect,
    moved_y: Rect,
    original: Vec2,
}

impl Sweep {
    fn new(collider: Rect, velocity: Vec2) -> Self {
        Self {
            collider,
            moved_x: collider.translated(velocity.x, 0.0),
            moved_y: collider.translated(0.0, velocity.y),
            original: velocity,
        }
    }

    /// Broad-phase query box: the collider moved by the full velocity
    fn query(&self) -> Rect {
        self.collider.translated(self.original.x, self.original.y)
    }
}

/// Work that must run after the candidate's borrow is released
enum Deferred {
    Members(Vec<ShapeHandle>),
    Dispatch(Arc<MessageManager>, ZoneMessage),
}

impl Body {
    /// Resolve every hitbox against its broad-phase candidates, adjusting
    /// the velocity in place. Returns the axes that made contact.
    pub(super) fn resolve_forces(&mut self) -> ResolvedAxes {
        let hitboxes = self.hitboxes();
        let mut resolved = ResolvedAxes::empty();

        for hitbox in &hitboxes {
            let sweep = Sweep::new(hitbox.bounds(), self.velocity);
            let candidates = self.index.borrow().retrieve(Some(&sweep.query()));
            self.resolve_candidates(&candidates, &hitboxes, &sweep, &mut resolved);
        }

        if !resolved.is_empty() {
            log::trace!("Body {} resolved {:?}, velocity {:?}", self.id(), resolved, self.velocity);
        }
        resolved
    }

    fn resolve_candidates(
        &mut self,
        candidates: &[ShapeHandle],
        own: &[ShapeHandle],
        sweep: &Sweep,
        resolved: &mut ResolvedAxes,
    ) {
        for candidate in candidates {
            if candidate.id() == self.id() || own.iter().any(|hitbox| hitbox.ptr_eq(candidate)) {
                continue;
            }

            let deferred = {
                let shape = candidate.borrow();
                match shape.kind() {
                    ShapeKind::Space(space) => Some(Deferred::Members(space.members().to_vec())),
                    ShapeKind::Zone(zone) => zone
                        .trigger(&self.space, &sweep.collider)
                        .map(|message| Deferred::Dispatch(Arc::clone(zone.mailbox()), message)),
                    ShapeKind::Rectangle(rect) => {
                        self.resolve_rectangle(rect, sweep, resolved);
                        None
                    }
                    ShapeKind::Platform(rect) => {
                        self.resolve_platform(rect, sweep, resolved);
                        None
                    }
                    ShapeKind::Slope(slope) => {
                        if slope.overlaps(&sweep.moved_y) && self.resolve_slope(slope, sweep) {
                            resolved.insert(ResolvedAxes::Y);
                        }
                        None
                    }
                    ShapeKind::SlopePlatform(platform) => {
                        self.resolve_slope_platform(platform, sweep, resolved);
                        None
                    }
                }
            };

            match deferred {
                Some(Deferred::Members(members)) => {
                    self.resolve_candidates(&members, own, sweep, resolved);
                }
                Some(Deferred::Dispatch(mailbox, message)) => {
                    log::debug!(
                        "Body {} entered zone {} ('{}')",
                        self.id(),
                        candidate.id(),
                        message.message_type()
                    );
                    mailbox.dispatch(&message);
                }
                None => {}
            }
        }
    }

    fn resolve_rectangle(&mut self, rect: &Rect, sweep: &Sweep, resolved: &mut ResolvedAxes) {
        if !resolved.contains(ResolvedAxes::X) && rect.overlaps(&sweep.moved_x) {
            let overlap = rect.overlap_rect(&sweep.moved_x);
            resolved.insert(ResolvedAxes::X);

            if self.velocity.x > 0.0 {
                self.velocity.x -= overlap.width;
            } else {
                self.velocity.x += overlap.width;
            }
        }

        if !resolved.contains(ResolvedAxes::Y) && rect.overlaps(&sweep.moved_y) {
            let overlap = rect.overlap_rect(&sweep.moved_y);
            resolved.insert(ResolvedAxes::Y);

            if self.velocity.y > 0.0 {
                self.on_ground = true;
                self.velocity.y -= overlap.height;
            } else {
                self.velocity.y += overlap.height;
            }
        }
    }

    /// One-way platforms only catch bodies moving down whose overlap starts
    /// below the vertical centre of the moved box.
    fn resolve_platform(&mut self, rect: &Rect, sweep: &Sweep, resolved: &mut ResolvedAxes) {
        if resolved.contains(ResolvedAxes::Y) || self.velocity.y <= 0.0 || !rect.overlaps(&sweep.moved_y) {
            return;
        }

        let overlap = rect.overlap_rect(&sweep.moved_y);
        if overlap.y > sweep.moved_y.center().y {
            resolved.insert(ResolvedAxes::Y);
            self.on_ground = true;
            self.velocity.y -= overlap.height;
        }
    }

    /// Landing zone 1, landing zone 2, then the main slope. Each hit
    /// overwrites the vertical velocity, so the last one wins.
    fn resolve_slope_platform(&mut self, platform: &SlopePlatform, sweep: &Sweep, resolved: &mut ResolvedAxes) {
        if !platform.overlaps(&sweep.moved_y) {
            return;
        }
        for part in platform.parts() {
            if self.resolve_slope(part, sweep) {
                resolved.insert(ResolvedAxes::Y);
            }
        }
    }

    /// Fit a line through the nearest and farthest points where the slope
    /// crosses the moved box's sides and top, then lift the box so its
    /// bottom half sits on that line.
    fn resolve_slope(&mut self, slope: &Slope, sweep: &Sweep) -> bool {
        let [left, _bottom, right, top] = Segment::edges_of(&sweep.moved_y);
        let hits = slope.intersections_with_segments(&[left, right, top]);

        let (Some(first), Some(last)) = (hits.first(), hits.last()) else {
            return false;
        };

        let dy = last.point.y - first.point.y;
        let contact = Rect::new(
            sweep.moved_y.x,
            first.point.y + dy / 2.0,
            sweep.moved_y.width,
            sweep.moved_y.height / 2.0,
        );
        let overlap = contact.overlap_rect(&sweep.moved_y);

        self.on_ground = true;
        self.velocity.y = sweep.original.y - overlap.height;
        true
    }
}
