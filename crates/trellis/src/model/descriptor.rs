//! Row and column descriptors.
//!
//! A [`Descriptor`] is a shared handle to the record a model keeps for one
//! grid line. Handles compare by identity: two clones of the same descriptor
//! are equal, two descriptors with identical state are not.
//!
//! Descriptors are created by [`RowColModel::create`](super::RowColModel::create),
//! which wires them back to the model so that resizing, hiding, replacing the
//! builder and expanding notify it. The back-reference is weak; a descriptor
//! that outlives its model simply stops notifying.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use trellis_core::Property;
use trellis_core::logging::targets;

use super::axis::Axis;
use super::builder::Builder;
use super::cell_class::CellClassId;
use super::event::StructuralChange;
use super::row_col::{ModelInner, RowColModel};
use crate::error::Result;

#[derive(Debug)]
struct DescriptorState {
    index: Option<usize>,
    header: bool,
    fixed: bool,
    selected: bool,
    selectable: bool,
    expanded: bool,
    /// How many descriptors the current expansion inserted.
    expanded_count: usize,
    children: Option<Vec<Descriptor>>,
    builder: Option<Builder>,
    built_actionable: bool,
    drag_ready_class: Option<CellClassId>,
    expanded_class: Option<CellClassId>,
}

impl Default for DescriptorState {
    fn default() -> Self {
        Self {
            index: None,
            header: false,
            fixed: false,
            selected: false,
            selectable: true,
            expanded: false,
            expanded_count: 0,
            children: None,
            builder: None,
            built_actionable: true,
            drag_ready_class: None,
            expanded_class: None,
        }
    }
}

struct DescriptorInner {
    axis: Axis,
    model: Weak<ModelInner>,
    size: Property<Option<f32>>,
    hidden: Property<bool>,
    state: RwLock<DescriptorState>,
}

/// Shared handle to a row or column record.
#[derive(Clone)]
pub struct Descriptor {
    inner: Arc<DescriptorInner>,
}

impl Descriptor {
    pub(crate) fn new(axis: Axis, model: Weak<ModelInner>, builder: Option<Builder>) -> Self {
        Self {
            inner: Arc::new(DescriptorInner {
                axis,
                model,
                size: Property::new(None),
                hidden: Property::new(false),
                state: RwLock::new(DescriptorState {
                    builder,
                    ..DescriptorState::default()
                }),
            }),
        }
    }

    /// The axis this descriptor belongs to.
    pub fn axis(&self) -> Axis {
        self.inner.axis
    }

    /// Current header-inclusive position, or `None` outside a sequence.
    ///
    /// Positions change with every structural mutation; do not cache them.
    pub fn index(&self) -> Option<usize> {
        self.inner.state.read().index
    }

    // =========================================================================
    // Size and visibility
    // =========================================================================

    /// Explicit size (height for rows, width for columns), if set.
    pub fn size(&self) -> Option<f32> {
        self.inner.size.get()
    }

    /// Set or clear the explicit size.
    ///
    /// A real change marks the owning model dirty and publishes a resize event.
    pub fn set_size(&self, size: Option<f32>) {
        if self.inner.size.set(size) {
            self.notify(StructuralChange::Resize(self.clone()));
        }
    }

    /// Returns `true` if the descriptor renders with zero size.
    pub fn is_hidden(&self) -> bool {
        self.inner.hidden.get()
    }

    /// Hide or show the descriptor.
    ///
    /// A real change marks the owning model dirty and publishes a hide event.
    pub fn set_hidden(&self, hidden: bool) {
        if self.inner.hidden.set(hidden) {
            self.notify(StructuralChange::Hide(self.clone()));
        }
    }

    /// Rendered size given the model default.
    pub(crate) fn effective_size(&self, default_size: f32) -> f32 {
        if self.is_hidden() {
            return 0.0;
        }
        match self.size() {
            Some(size) if size > 0.0 => size,
            _ => default_size,
        }
    }

    // =========================================================================
    // Header and fixed status
    // =========================================================================

    /// Returns `true` for header descriptors.
    pub fn is_header(&self) -> bool {
        self.inner.state.read().header
    }

    /// Mark the descriptor as a header.
    ///
    /// Only allowed while the descriptor is outside a sequence; returns
    /// `false` if the change was refused.
    pub fn set_header(&self, header: bool) -> bool {
        let mut state = self.inner.state.write();
        if state.index.is_some() {
            tracing::warn!(target: targets::MODEL, index = ?state.index, "cannot change header status of a placed descriptor");
            return false;
        }
        state.header = header;
        true
    }

    /// Returns `true` for fixed descriptors. Headers are always fixed.
    pub fn is_fixed(&self) -> bool {
        let state = self.inner.state.read();
        state.header || state.fixed
    }

    /// Pin the descriptor next to the header prefix.
    ///
    /// Only allowed while the descriptor is outside a sequence; returns
    /// `false` if the change was refused.
    pub fn set_fixed(&self, fixed: bool) -> bool {
        let mut state = self.inner.state.write();
        if state.index.is_some() {
            tracing::warn!(target: targets::MODEL, index = ?state.index, "cannot change fixed status of a placed descriptor");
            return false;
        }
        state.fixed = fixed;
        true
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns `true` while the descriptor is selected.
    pub fn is_selected(&self) -> bool {
        self.inner.state.read().selected
    }

    /// Returns `true` if the descriptor may be selected.
    pub fn is_selectable(&self) -> bool {
        self.inner.state.read().selectable
    }

    /// Allow or forbid selecting the descriptor. Existing selection is kept.
    pub fn set_selectable(&self, selectable: bool) {
        self.inner.state.write().selectable = selectable;
    }

    /// Drag-ready highlight registered while selected.
    pub fn drag_ready_class(&self) -> Option<CellClassId> {
        self.inner.state.read().drag_ready_class
    }

    // =========================================================================
    // Children and expansion
    // =========================================================================

    /// The child descriptors, if this descriptor is expandable.
    pub fn children(&self) -> Option<Vec<Descriptor>> {
        self.inner.state.read().children.clone()
    }

    /// Returns `true` if the descriptor has a children sequence.
    pub fn has_children(&self) -> bool {
        self.inner.state.read().children.is_some()
    }

    /// Give the descriptor a children sequence, making it expandable.
    ///
    /// Children are captured as-is; an expansion always splices this exact
    /// sequence. Replacing children while expanded does not change how many
    /// descriptors the next collapse removes.
    pub fn set_children(&self, children: Vec<Descriptor>) {
        self.inner.state.write().children = Some(children);
    }

    /// Returns `true` while the children are spliced into the sequence.
    pub fn is_expanded(&self) -> bool {
        self.inner.state.read().expanded
    }

    /// Expand or collapse through the owning model.
    ///
    /// Returns `Ok(true)` if the expansion state changed. See
    /// [`RowColModel::set_expanded`].
    pub fn set_expanded(&self, expanded: bool) -> Result<bool> {
        match self.model() {
            Some(model) => model.set_expanded(self, expanded),
            None => Ok(false),
        }
    }

    /// Expansion marker registered while expanded.
    pub fn expanded_class(&self) -> Option<CellClassId> {
        self.inner.state.read().expanded_class
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// The render callbacks, if any.
    pub fn builder(&self) -> Option<Builder> {
        self.inner.state.read().builder.clone()
    }

    /// Replace the render callbacks. Marks only the builder flag dirty.
    pub fn set_builder(&self, builder: Option<Builder>) {
        self.inner.state.write().builder = builder;
        if let Some(model) = self.inner.model.upgrade() {
            model.builder_dirty.set_dirty();
        }
    }

    /// Returns `true` if rendered cells of this descriptor take part in
    /// grid interaction. Defaults to `true`.
    pub fn is_built_actionable(&self) -> bool {
        self.inner.state.read().built_actionable
    }

    /// Opt rendered cells in or out of grid interaction.
    pub fn set_built_actionable(&self, actionable: bool) {
        self.inner.state.write().built_actionable = actionable;
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns `true` if both handles point at the same descriptor.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` if `model` created this descriptor.
    pub(crate) fn is_owned_by(&self, model: &Arc<ModelInner>) -> bool {
        std::ptr::eq(self.inner.model.as_ptr(), Arc::as_ptr(model))
    }

    /// The model that created this descriptor, if it is still alive.
    pub fn model(&self) -> Option<RowColModel> {
        self.inner.model.upgrade().map(RowColModel::from_inner)
    }

    fn notify(&self, change: StructuralChange) {
        if let Some(model) = self.model() {
            model.set_descriptors_dirty(change);
        }
    }

    // =========================================================================
    // Model bookkeeping
    // =========================================================================

    pub(crate) fn set_index(&self, index: Option<usize>) {
        self.inner.state.write().index = index;
    }

    pub(crate) fn set_selected(&self, selected: bool) {
        self.inner.state.write().selected = selected;
    }

    pub(crate) fn replace_drag_ready_class(&self, id: Option<CellClassId>) -> Option<CellClassId> {
        std::mem::replace(&mut self.inner.state.write().drag_ready_class, id)
    }

    pub(crate) fn expanded_count(&self) -> usize {
        self.inner.state.read().expanded_count
    }

    pub(crate) fn set_expansion(&self, expanded: bool, count: usize) {
        let mut state = self.inner.state.write();
        state.expanded = expanded;
        state.expanded_count = count;
    }

    pub(crate) fn replace_expanded_class(&self, id: Option<CellClassId>) -> Option<CellClassId> {
        std::mem::replace(&mut self.inner.state.write().expanded_class, id)
    }

    /// Detach from the sequence: forget the position, selection and
    /// expansion, and hand back any visual tokens for the caller to release.
    ///
    /// Spliced children stay where they are.
    pub(crate) fn detach(&self) -> Vec<CellClassId> {
        let mut state = self.inner.state.write();
        state.index = None;
        state.selected = false;
        state.expanded = false;
        state.expanded_count = 0;
        [state.drag_ready_class.take(), state.expanded_class.take()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Descriptor {}

impl Hash for Descriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.inner), state);
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Descriptor")
            .field("axis", &self.inner.axis)
            .field("index", &state.index)
            .field("size", &self.inner.size.get())
            .field("hidden", &self.inner.hidden.get())
            .field("header", &state.header)
            .field("fixed", &state.fixed)
            .field("selected", &state.selected)
            .field("expanded", &state.expanded)
            .field("children", &state.children.as_ref().map(Vec::len))
            .finish()
    }
}
