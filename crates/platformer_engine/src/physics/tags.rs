//! Shape tags for filtering and gameplay queries

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label attached to a shape
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Solid geometry
    Collision,
    /// Collider belonging to a moving entity
    Hitbox,
    /// Space owned by a [`Body`](crate::physics::Body)
    PhysicsBody,
    /// Walkable surface
    Ground,
    /// The player character
    Player,
    /// Game-defined label
    Custom(String),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collision => f.write_str("collision"),
            Self::Hitbox => f.write_str("hitbox"),
            Self::PhysicsBody => f.write_str("physics_body"),
            Self::Ground => f.write_str("ground"),
            Self::Player => f.write_str("player"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Set of tags; ordering is stable for display and comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags(BTreeSet<Tag>);

impl Tags {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert tags; already present ones are ignored
    pub fn add(&mut self, tags: &[Tag]) {
        self.0.extend(tags.iter().cloned());
    }

    /// Remove the given tags if present
    pub fn remove(&mut self, tags: &[Tag]) {
        for tag in tags {
            self.0.remove(tag);
        }
    }

    /// Remove every tag
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// True when every requested tag is present. An empty request is always satisfied.
    pub fn has_all(&self, tags: &[Tag]) -> bool {
        tags.iter().all(|tag| self.0.contains(tag))
    }

    /// Single-tag membership
    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Iterate in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Tags present in either set
    #[must_use]
    pub fn union(&self, other: &Tags) -> Tags {
        Tags(self.0.union(&other.0).cloned().collect())
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no tag is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_all_requires_every_tag() {
        let tags: Tags = [Tag::Collision, Tag::Ground].into_iter().collect();

        assert!(tags.has_all(&[Tag::Ground]));
        assert!(tags.has_all(&[Tag::Ground, Tag::Collision]));
        assert!(!tags.has_all(&[Tag::Ground, Tag::Player]));
        assert!(tags.has_all(&[]));
    }

    #[test]
    fn test_add_is_a_set() {
        let mut tags = Tags::new();
        tags.add(&[Tag::Player, Tag::Player, Tag::Custom("door".into())]);
        assert_eq!(tags.len(), 2);

        tags.remove(&[Tag::Player, Tag::Ground]);
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![&Tag::Custom("door".into())]);
    }

    #[test]
    fn test_union() {
        let a: Tags = [Tag::Hitbox].into_iter().collect();
        let b: Tags = [Tag::Player, Tag::Hitbox].into_iter().collect();
        let both = a.union(&b);
        assert!(both.has_all(&[Tag::Hitbox, Tag::Player]));
        assert_eq!(both.len(), 2);
    }
}
