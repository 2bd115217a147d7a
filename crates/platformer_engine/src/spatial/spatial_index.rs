//! Uniform grid hash for broad-phase queries
//!
//! World space is cut into square cells of `2^shift` units. A shape is
//! referenced from every cell its bounding box touches, plus once in a flat
//! list of everything inserted.

use std::collections::HashMap;

use crate::core::PhysicsConfig;
use crate::foundation::math::Rect;
use crate::physics::collision::ShapeHandle;

/// Integer grid coordinate of a cell
pub type CellKey = (i32, i32);

/// Grid hash mapping cells to shape references
///
/// Inserting the same shape twice stores it twice; avoiding that is up to
/// the caller. Shapes are indexed by their bounds at insertion time, so a
/// shape that moves afterwards must be removed and re-inserted to be found
/// at its new location.
#[derive(Debug)]
pub struct SpatialIndex {
    shift: u32,
    cells: HashMap<CellKey, Vec<ShapeHandle>>,
    list: Vec<ShapeHandle>,
    footprints: HashMap<*const (), Vec<CellKey>>,
}

impl SpatialIndex {
    /// Create an index whose cells span `2^shift` world units
    pub fn new(shift: u32) -> Self {
        Self {
            shift,
            cells: HashMap::new(),
            list: Vec::new(),
            footprints: HashMap::new(),
        }
    }

    /// Create an index with the configured cell size
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.cell_shift)
    }

    /// Cell size exponent
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Cell size in world units
    pub fn cell_size(&self) -> u32 {
        1 << self.shift
    }

    /// Cell containing a world coordinate pair
    pub fn cell_of(&self, x: f32, y: f32) -> CellKey {
        (x.floor() as i32 >> self.shift, y.floor() as i32 >> self.shift)
    }

    /// Every cell a box spans, row by row, min and max corners inclusive
    pub fn cells_for(&self, bounds: &Rect) -> Vec<CellKey> {
        let (sx, sy) = self.cell_of(bounds.x, bounds.y);
        let (ex, ey) = self.cell_of(bounds.right(), bounds.bottom());

        let mut keys = Vec::new();
        for y in sy..=ey {
            for x in sx..=ex {
                keys.push((x, y));
            }
        }
        keys
    }

    /// Add a shape to every cell its current bounds span and to the flat list
    pub fn insert(&mut self, shape: &ShapeHandle) {
        let keys = self.cells_for(&shape.bounds());
        log::trace!("Indexing shape {} in {} cell(s)", shape.id(), keys.len());

        for key in &keys {
            self.cells.entry(*key).or_default().push(shape.clone());
        }
        self.list.push(shape.clone());
        self.footprints.entry(shape.address()).or_default().extend(keys);
    }

    /// Insert several shapes in order
    pub fn insert_all<'a>(&mut self, shapes: impl IntoIterator<Item = &'a ShapeHandle>) {
        for shape in shapes {
            self.insert(shape);
        }
    }

    /// Remove every reference to `shape`. Absent shapes are ignored.
    ///
    /// Both the cells recorded at insertion and the cells under the shape's
    /// current bounds are purged, so shapes that moved since insertion leave
    /// nothing behind.
    pub fn remove(&mut self, shape: &ShapeHandle) {
        let mut keys = self.footprints.remove(&shape.address()).unwrap_or_default();
        keys.extend(self.cells_for(&shape.bounds()));
        keys.sort_unstable();
        keys.dedup();

        for key in keys {
            if let Some(bucket) = self.cells.get_mut(&key) {
                bucket.retain(|candidate| !candidate.ptr_eq(shape));
                if bucket.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }

        let before = self.list.len();
        self.list.retain(|candidate| !candidate.ptr_eq(shape));
        if self.list.len() != before {
            log::trace!("Removed shape {} from index", shape.id());
        }
    }

    /// Candidate shapes near `query`.
    ///
    /// `None` returns the flat list of everything inserted. Otherwise the
    /// contents of every cell the query spans are concatenated; a shape that
    /// spans several of those cells appears once per cell.
    pub fn retrieve(&self, query: Option<&Rect>) -> Vec<ShapeHandle> {
        let Some(query) = query else {
            return self.list.clone();
        };

        self.cells_for(query)
            .iter()
            .filter_map(|key| self.cells.get(key))
            .flat_map(|bucket| bucket.iter().cloned())
            .collect()
    }

    /// True if `shape` is in the flat list
    pub fn contains(&self, shape: &ShapeHandle) -> bool {
        self.list.iter().any(|candidate| candidate.ptr_eq(shape))
    }

    /// Empty every cell and the flat list
    pub fn clear(&mut self) {
        self.cells.clear();
        self.list.clear();
        self.footprints.clear();
    }

    /// Number of insertions currently held
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// True when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Number of non-empty cells
    pub fn num_buckets(&self) -> usize {
        self.cells.values().filter(|bucket| !bucket.is_empty()).count()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}
