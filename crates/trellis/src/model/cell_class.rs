//! Cell classes: visual highlight regions owned by an external registry.
//!
//! The model asks a [`CellClasses`] collaborator for tokens while a
//! descriptor is selected (drag-ready highlight) or expanded (full-span
//! marker). Tokens are opaque [`CellClassId`] handles; the registry stays the
//! sole owner of what they describe.
//!
//! [`CellClassRegistry`] is an in-memory implementation suitable for hosts
//! that do not bring their own.

use std::fmt;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};
use trellis_core::Signal;
use trellis_core::logging::targets;

new_key_type! {
    /// Handle to a cell class registered with a [`CellClasses`] registry.
    pub struct CellClassId;
}

/// How far a cell class extends along one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// A fixed number of cells.
    Cells(usize),
    /// Spans to the end of the grid.
    Unbounded,
}

impl Default for Extent {
    fn default() -> Self {
        Self::Cells(1)
    }
}

/// Which index space the class coordinates are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSpace {
    /// Header-exclusive indices.
    #[default]
    Data,
    /// Header-inclusive indices.
    Virtual,
}

/// Description of a cell class region.
///
/// A coordinate of `-1` starts the region before the first line of the
/// axis, so the class also covers the header cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellClassSpec {
    /// First row covered.
    pub top: isize,
    /// First column covered.
    pub left: isize,
    /// Class name applied to the covered cells.
    pub class_name: String,
    /// Row extent.
    pub height: Extent,
    /// Column extent.
    pub width: Extent,
    /// Coordinate space of `top` and `left`.
    pub space: CoordinateSpace,
}

impl CellClassSpec {
    /// A single-cell class in data space.
    pub fn new(top: isize, left: isize, class_name: impl Into<String>) -> Self {
        Self {
            top,
            left,
            class_name: class_name.into(),
            height: Extent::default(),
            width: Extent::default(),
            space: CoordinateSpace::Data,
        }
    }

    /// Set the row and column extents.
    pub fn with_extent(mut self, height: Extent, width: Extent) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    /// Set the coordinate space.
    pub fn in_space(mut self, space: CoordinateSpace) -> Self {
        self.space = space;
        self
    }
}

/// The cell-class registry collaborator.
pub trait CellClasses: Send + Sync {
    /// Register a class description and return its handle. The class is not
    /// applied until [`add`](Self::add) is called.
    fn create(&self, spec: CellClassSpec) -> CellClassId;

    /// Apply a created class.
    fn add(&self, id: CellClassId);

    /// Release a class. Unknown handles are ignored.
    fn remove(&self, id: CellClassId);
}

#[derive(Debug)]
struct Entry {
    spec: CellClassSpec,
    active: bool,
}

/// In-memory [`CellClasses`] implementation.
///
/// # Signals
///
/// - `changed`: Emitted whenever a class is applied or released.
#[derive(Default)]
pub struct CellClassRegistry {
    entries: Mutex<SlotMap<CellClassId, Entry>>,
    /// Emitted whenever a class is applied or released.
    pub changed: Signal<()>,
}

impl CellClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a class description.
    pub fn get(&self, id: CellClassId) -> Option<CellClassSpec> {
        self.entries.lock().get(id).map(|entry| entry.spec.clone())
    }

    /// Returns `true` if the class exists and has been applied.
    pub fn is_active(&self, id: CellClassId) -> bool {
        self.entries.lock().get(id).is_some_and(|entry| entry.active)
    }

    /// Number of applied classes.
    pub fn active_count(&self) -> usize {
        self.entries.lock().values().filter(|entry| entry.active).count()
    }

    /// Snapshot of every applied class.
    pub fn active_classes(&self) -> Vec<(CellClassId, CellClassSpec)> {
        self.entries
            .lock()
            .iter()
            .filter(|(_, entry)| entry.active)
            .map(|(id, entry)| (id, entry.spec.clone()))
            .collect()
    }

    /// Number of classes with a given name, applied or not.
    pub fn count_named(&self, class_name: &str) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.spec.class_name == class_name)
            .count()
    }
}

impl CellClasses for CellClassRegistry {
    fn create(&self, spec: CellClassSpec) -> CellClassId {
        tracing::trace!(target: targets::CELL_CLASSES, class = %spec.class_name, top = spec.top, left = spec.left, "cell class created");
        self.entries.lock().insert(Entry { spec, active: false })
    }

    fn add(&self, id: CellClassId) {
        let applied = match self.entries.lock().get_mut(id) {
            Some(entry) if !entry.active => {
                entry.active = true;
                true
            }
            _ => false,
        };
        if applied {
            self.changed.emit(());
        }
    }

    fn remove(&self, id: CellClassId) {
        let removed = self.entries.lock().remove(id);
        if removed.is_some_and(|entry| entry.active) {
            self.changed.emit(());
        }
    }
}

impl fmt::Debug for CellClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellClassRegistry")
            .field("entries", &self.entries.lock().len())
            .finish()
    }
}
