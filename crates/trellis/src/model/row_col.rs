//! The row/column model.
//!
//! [`RowColModel`] owns the ordered sequence of [`Descriptor`]s for one grid
//! axis. The sequence is always laid out as
//!
//! ```text
//! [headers][fixed][normal]
//! ```
//!
//! Positions in the whole sequence are *virtual* indices; positions past the
//! header prefix are *data* indices. Every structural mutation renumbers the
//! descriptors, raises both dirty flags and publishes one
//! [`GridEvent::RowColChange`] on the shared event loop. Selection changes are
//! debounced: any burst of calls before the host drains the event loop
//! produces a single [`GridEvent::SelectionChange`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::{Axis, CellClassRegistry, EventLoop, RowColModel};
//!
//! let event_loop = Arc::new(EventLoop::new());
//! let rows = RowColModel::new(Axis::Row, event_loop.clone(), Arc::new(CellClassRegistry::new()));
//!
//! let header = rows.create(None);
//! rows.add_headers([header]).unwrap();
//! rows.add((0..3).map(|_| rows.create(None))).unwrap();
//!
//! assert_eq!(rows.length(false), 3);
//! assert_eq!(rows.to_virtual(0), 1);
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use trellis_core::logging::targets;
use trellis_core::{Debouncer, DirtyClean, EventLoop, Property};

use super::axis::Axis;
use super::builder::{Builder, RenderFn, UpdateFn};
use super::cell_class::{CellClassId, CellClasses};
use super::config::{RowColConfig, RowColModelBuilder};
use super::descriptor::Descriptor;
use super::event::{GridEvent, RowColEvent, StructuralChange};
use crate::error::{Result, RowColError, Violation};

/// The ordered descriptors plus the bookkeeping derived from them.
#[derive(Debug, Default)]
pub(crate) struct Sequence {
    pub(crate) descriptors: Vec<Descriptor>,
    pub(crate) num_fixed: usize,
    pub(crate) num_headers: usize,
    /// Selected data indices, rebuilt by every reindex.
    pub(crate) selected: BTreeSet<usize>,
}

impl Sequence {
    /// Position of a descriptor, trusting its index when it still matches.
    pub(crate) fn position_of(&self, descriptor: &Descriptor) -> Option<usize> {
        if let Some(hint) = descriptor.index()
            && self.descriptors.get(hint).is_some_and(|d| d.ptr_eq(descriptor))
        {
            return Some(hint);
        }
        self.descriptors.iter().position(|d| d.ptr_eq(descriptor))
    }

    /// Data-space lookup.
    pub(crate) fn data(&self, index: usize) -> Option<&Descriptor> {
        self.descriptors.get(index.checked_add(self.num_headers)?)
    }

    /// Renumber every descriptor and rebuild the selection set.
    ///
    /// Returns `true` if the selection set changed.
    pub(crate) fn reindex(&mut self) -> bool {
        for (position, descriptor) in self.descriptors.iter().enumerate() {
            descriptor.set_index(Some(position));
        }
        let selected: BTreeSet<usize> = self.descriptors[self.num_headers.min(self.descriptors.len())..]
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| descriptor.is_selected())
            .map(|(index, _)| index)
            .collect();
        let changed = selected != self.selected;
        self.selected = selected;
        changed
    }

    /// Remove the descriptor at `position`, keeping the counters in step.
    pub(crate) fn splice_out(&mut self, position: usize) -> Descriptor {
        let descriptor = self.descriptors.remove(position);
        if descriptor.is_header() {
            self.num_headers = self.num_headers.saturating_sub(1);
            self.num_fixed = self.num_fixed.saturating_sub(1);
        } else if descriptor.is_fixed() {
            self.num_fixed = self.num_fixed.saturating_sub(1);
        }
        descriptor
    }

    /// Recompute both counters from the descriptors.
    pub(crate) fn recount(&mut self) {
        self.num_headers = self.descriptors.iter().filter(|d| d.is_header()).count();
        self.num_fixed = self.descriptors.iter().filter(|d| d.is_fixed()).count();
    }

    /// Validate an `add` batch against the current tail.
    fn check_addable(&self, owner: &Arc<ModelInner>, batch: &[Descriptor]) -> Result<()> {
        let mut tail_fixed = self.descriptors.last().is_none_or(Descriptor::is_fixed);
        let mut seen = HashSet::with_capacity(batch.len());

        for (position, descriptor) in batch.iter().enumerate() {
            if !descriptor.is_owned_by(owner) {
                return Err(RowColError::violation(Violation::ForeignDescriptor, position));
            }
            if descriptor.index().is_some() || !seen.insert(descriptor.clone()) {
                return Err(RowColError::violation(Violation::AlreadyInSequence, position));
            }
            if descriptor.is_header() {
                continue;
            }
            if descriptor.is_fixed() {
                if !tail_fixed {
                    return Err(RowColError::violation(Violation::FixedAfterUnfixed, position));
                }
            } else {
                tail_fixed = false;
            }
        }
        Ok(())
    }

    /// Insert one validated descriptor.
    fn insert(&mut self, descriptor: Descriptor) {
        if descriptor.is_header() {
            self.descriptors.insert(self.num_headers, descriptor);
            self.num_headers += 1;
            self.num_fixed += 1;
        } else {
            if descriptor.is_fixed() {
                self.num_fixed += 1;
            }
            self.descriptors.push(descriptor);
        }
    }
}

/// Check that a candidate sequence is laid out as `[headers][fixed][normal]`.
pub(crate) fn check_layout(descriptors: &[Descriptor]) -> Result<()> {
    let mut phase = 0_u8;
    for (position, descriptor) in descriptors.iter().enumerate() {
        let (rank, violation) = if descriptor.is_header() {
            (0, Violation::HeaderOutsidePrefix)
        } else if descriptor.is_fixed() {
            (1, Violation::FixedOutsideBlock)
        } else {
            (2, Violation::FixedOutsideBlock)
        };
        if rank < phase {
            return Err(RowColError::violation(violation, position));
        }
        phase = rank;
    }
    Ok(())
}

pub(crate) struct ModelInner {
    pub(crate) axis: Axis,
    pub(crate) config: RowColConfig,
    pub(crate) default_size: Property<f32>,
    pub(crate) sequence: Mutex<Sequence>,
    pub(crate) dirty: DirtyClean,
    pub(crate) builder_dirty: DirtyClean,
    pub(crate) event_loop: Arc<EventLoop<GridEvent>>,
    pub(crate) cell_classes: Arc<dyn CellClasses>,
    pub(crate) selection_changed: Debouncer,
}

impl Drop for ModelInner {
    fn drop(&mut self) {
        self.selection_changed.cancel();
    }
}

/// The descriptor sequence for one grid axis.
///
/// `RowColModel` is a cheap, cloneable handle; clones share the same model.
///
/// # Signals
///
/// The model publishes on the event loop it was created with:
///
/// - [`GridEvent::RowColChange`]: once per add, remove, clear, move, resize,
///   hide, expand and collapse.
/// - [`GridEvent::SelectionChange`]: once per settled burst of selection
///   changes, when the host calls [`EventLoop::process_tasks`].
///
/// The dirty flags expose their own `changed` signals through
/// [`dirty`](Self::dirty) and [`builder_dirty`](Self::builder_dirty).
#[derive(Clone)]
pub struct RowColModel {
    pub(crate) inner: Arc<ModelInner>,
}

impl RowColModel {
    /// Create a model with the axis defaults.
    pub fn new(
        axis: Axis,
        event_loop: Arc<EventLoop<GridEvent>>,
        cell_classes: Arc<dyn CellClasses>,
    ) -> Self {
        Self::with_config(axis, RowColConfig::for_axis(axis), event_loop, cell_classes)
    }

    /// Create a model with a custom configuration.
    pub fn with_config(
        axis: Axis,
        config: RowColConfig,
        event_loop: Arc<EventLoop<GridEvent>>,
        cell_classes: Arc<dyn CellClasses>,
    ) -> Self {
        let weak_loop = Arc::downgrade(&event_loop);
        let selection_changed = Debouncer::new(event_loop.task_queue(), move || {
            if let Some(event_loop) = weak_loop.upgrade() {
                tracing::trace!(target: targets::MODEL, axis = %axis, "selection settled");
                event_loop.fire(GridEvent::SelectionChange { axis });
            }
        });

        tracing::debug!(target: targets::MODEL, axis = %axis, default_size = config.default_size, "creating row/col model");

        Self {
            inner: Arc::new(ModelInner {
                axis,
                default_size: Property::new(config.default_size),
                config,
                sequence: Mutex::new(Sequence::default()),
                dirty: DirtyClean::new(),
                builder_dirty: DirtyClean::new(),
                event_loop,
                cell_classes,
                selection_changed,
            }),
        }
    }

    /// Start building a model with custom configuration.
    pub fn builder(axis: Axis) -> RowColModelBuilder {
        RowColModelBuilder::new(axis)
    }

    pub(crate) fn from_inner(inner: Arc<ModelInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn sequence(&self) -> MutexGuard<'_, Sequence> {
        self.inner.sequence.lock()
    }

    /// The axis this model manages.
    pub fn axis(&self) -> Axis {
        self.inner.axis
    }

    /// The configuration the model was created with.
    pub fn config(&self) -> &RowColConfig {
        &self.inner.config
    }

    /// The event loop the model publishes on.
    pub fn event_loop(&self) -> &Arc<EventLoop<GridEvent>> {
        &self.inner.event_loop
    }

    /// The cell-class collaborator the model registers visual tokens with.
    pub fn cell_classes(&self) -> &Arc<dyn CellClasses> {
        &self.inner.cell_classes
    }

    /// Returns `true` if both handles refer to the same model.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Factory
    // =========================================================================

    /// Create a descriptor wired to this model.
    ///
    /// The descriptor is not part of the sequence until it is added.
    pub fn create(&self, builder: Option<Builder>) -> Descriptor {
        Descriptor::new(self.inner.axis, Arc::downgrade(&self.inner), builder)
    }

    /// Create a builder from render and update callbacks.
    pub fn create_builder(&self, render: RenderFn, update: Option<UpdateFn>) -> Builder {
        Builder::new(render, update)
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Add descriptors.
    ///
    /// Headers are inserted at the end of the header prefix, everything else
    /// is appended. A fixed descriptor may only follow another fixed
    /// descriptor (or start an empty sequence).
    ///
    /// The batch is validated as a whole before anything is inserted; on
    /// error the model is left untouched.
    ///
    /// # Errors
    ///
    /// [`RowColError::StructuralConstraintViolation`] if a fixed descriptor
    /// would follow an unfixed one, a descriptor is already in a sequence, or
    /// a descriptor was created by another model.
    pub fn add<I>(&self, descriptors: I) -> Result<()>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        let batch: Vec<Descriptor> = descriptors.into_iter().collect();
        if batch.is_empty() {
            return Ok(());
        }

        let selection_changed = {
            let mut sequence = self.sequence();
            if let Err(err) = sequence.check_addable(&self.inner, &batch) {
                tracing::warn!(target: targets::MODEL, axis = %self.inner.axis, %err, "rejected add");
                return Err(err);
            }
            for descriptor in &batch {
                sequence.insert(descriptor.clone());
            }
            sequence.reindex()
        };

        tracing::debug!(target: targets::MODEL, axis = %self.inner.axis, count = batch.len(), "descriptors added");
        self.after_mutation(selection_changed, StructuralChange::Add(batch));
        Ok(())
    }

    /// Add descriptors as headers.
    ///
    /// Every descriptor is marked as a header before delegating to
    /// [`add`](Self::add). If the add fails, the marks are undone.
    pub fn add_headers<I>(&self, descriptors: I) -> Result<()>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        let batch: Vec<Descriptor> = descriptors.into_iter().collect();
        let marked: Vec<&Descriptor> = batch
            .iter()
            .filter(|d| !d.is_header() && d.index().is_none())
            .collect();
        for descriptor in &marked {
            descriptor.set_header(true);
        }

        let result = self.add(batch.iter().cloned());
        if result.is_err() {
            for descriptor in &marked {
                descriptor.set_header(false);
            }
        }
        result
    }

    /// Remove a descriptor.
    ///
    /// Returns `false` if the descriptor is not in this model. The removed
    /// descriptor loses its index and selection, and its visual tokens are
    /// released.
    ///
    /// With `suppress_event`, the remaining descriptors are not renumbered
    /// and no event fires; call [`reindex`](Self::reindex) after a batch of
    /// suppressed removals.
    pub fn remove(&self, descriptor: &Descriptor, suppress_event: bool) -> bool {
        let (tokens, selection_changed) = {
            let mut sequence = self.sequence();
            let Some(position) = sequence.position_of(descriptor) else {
                return false;
            };
            sequence.splice_out(position);
            let tokens = descriptor.detach();
            let changed = !suppress_event && sequence.reindex();
            (tokens, changed)
        };

        self.release_classes(tokens);
        tracing::trace!(target: targets::MODEL, axis = %self.inner.axis, suppress_event, "descriptor removed");
        if !suppress_event {
            self.after_mutation(selection_changed, StructuralChange::Remove(vec![descriptor.clone()]));
        }
        true
    }

    /// Remove every non-header descriptor, or everything with
    /// `include_headers`.
    pub fn clear(&self, include_headers: bool) {
        let (removed, tokens, selection_changed) = {
            let mut sequence = self.sequence();
            let start = if include_headers { 0 } else { sequence.num_headers };
            let removed: Vec<Descriptor> = sequence.descriptors.drain(start..).collect();
            if include_headers {
                sequence.num_headers = 0;
            }
            sequence.num_fixed = sequence.num_headers;
            let tokens: Vec<CellClassId> = removed.iter().flat_map(Descriptor::detach).collect();
            let changed = sequence.reindex();
            (removed, tokens, changed)
        };

        self.release_classes(tokens);
        if removed.is_empty() {
            if selection_changed {
                self.inner.selection_changed.schedule();
            }
            return;
        }

        tracing::debug!(target: targets::MODEL, axis = %self.inner.axis, count = removed.len(), include_headers, "model cleared");
        self.after_mutation(selection_changed, StructuralChange::Remove(removed));
    }

    /// Move descriptors to a new position.
    ///
    /// Indices are header-inclusive. A single source is spliced directly to
    /// `target` (clamped to the end); the event names the descriptors at
    /// `from` and `target` after the move.
    ///
    /// Several sources are moved as a block, in their original relative
    /// order, before (or with `after`, behind) the descriptor at `target`.
    /// If `target` is itself a source, the anchor steps backwards to the
    /// first non-source and the block goes after it; with no anchor left the
    /// block goes to the front. A `target` past the end appends. The event
    /// lists the moved descriptors followed by the anchor.
    ///
    /// Duplicate and out-of-range sources are ignored.
    ///
    /// # Errors
    ///
    /// [`RowColError::StructuralConstraintViolation`] if the result would
    /// move a header out of the header prefix or a fixed descriptor out of
    /// the fixed block. The model is left untouched.
    pub fn move_to<I>(&self, from: I, target: usize, after: bool) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let sources: Vec<usize> = from.into_iter().collect();

        let (reported, selection_changed) = {
            let mut sequence = self.sequence();
            let planned = match sources.as_slice() {
                [] => return Ok(()),
                [from] => plan_single_move(&sequence.descriptors, *from, target),
                _ => plan_block_move(&sequence.descriptors, sources.clone(), target, after),
            };
            let Some((next, reported)) = planned else {
                return Ok(());
            };
            if let Err(err) = check_layout(&next) {
                tracing::warn!(target: targets::MODEL, axis = %self.inner.axis, %err, ?sources, target, "rejected move");
                return Err(err);
            }
            sequence.descriptors = next;
            (reported, sequence.reindex())
        };

        tracing::debug!(target: targets::MODEL, axis = %self.inner.axis, ?sources, target, after, "descriptors moved");
        self.after_mutation(selection_changed, StructuralChange::Move(reported));
        Ok(())
    }

    /// Renumber every descriptor and rebuild the selection set.
    ///
    /// Needed after removals with `suppress_event`. Raises both dirty flags
    /// and schedules a selection notification if the selection moved.
    pub fn reindex(&self) {
        let selection_changed = self.sequence().reindex();
        if selection_changed {
            self.inner.selection_changed.schedule();
        }
        self.inner.dirty.set_dirty();
        self.inner.builder_dirty.set_dirty();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Descriptor at `index`, header-inclusive unless `data_space`.
    pub fn get(&self, index: usize, data_space: bool) -> Option<Descriptor> {
        let sequence = self.sequence();
        if data_space {
            sequence.data(index).cloned()
        } else {
            sequence.descriptors.get(index).cloned()
        }
    }

    /// Descriptor at a header-inclusive position.
    pub fn header(&self, index: usize) -> Option<Descriptor> {
        self.get(index, false)
    }

    /// Descriptor at a data-space position.
    pub fn data(&self, index: usize) -> Option<Descriptor> {
        self.get(index, true)
    }

    /// Number of descriptors, optionally counting the header prefix.
    pub fn length(&self, include_headers: bool) -> usize {
        let sequence = self.sequence();
        if include_headers {
            sequence.descriptors.len()
        } else {
            sequence.descriptors.len() - sequence.num_headers
        }
    }

    /// Returns `true` if the model holds no descriptors at all.
    pub fn is_empty(&self) -> bool {
        self.sequence().descriptors.is_empty()
    }

    /// Snapshot of the whole sequence.
    pub fn descriptors(&self) -> Vec<Descriptor> {
        self.sequence().descriptors.clone()
    }

    /// Header-inclusive position of a descriptor in this model.
    pub fn position_of(&self, descriptor: &Descriptor) -> Option<usize> {
        self.sequence().position_of(descriptor)
    }

    /// Number of header descriptors.
    pub fn num_headers(&self) -> usize {
        self.sequence().num_headers
    }

    /// Number of fixed descriptors, headers included unless `exclude_headers`.
    pub fn num_fixed(&self, exclude_headers: bool) -> usize {
        let sequence = self.sequence();
        if exclude_headers {
            sequence.num_fixed - sequence.num_headers
        } else {
            sequence.num_fixed
        }
    }

    /// Convert a data index to a virtual index.
    pub fn to_virtual(&self, data_index: isize) -> isize {
        data_index + self.num_headers() as isize
    }

    /// Convert a virtual index to a data index. Header positions map to
    /// negative values.
    pub fn to_data(&self, virtual_index: isize) -> isize {
        virtual_index - self.num_headers() as isize
    }

    // =========================================================================
    // Sizing
    // =========================================================================

    /// Rendered size at a header-inclusive position.
    ///
    /// Hidden descriptors measure 0. An unset or non-positive explicit size
    /// falls back to the model default. Returns `f32::NAN` past the end.
    pub fn size_of(&self, index: usize) -> f32 {
        let descriptor = self.sequence().descriptors.get(index).cloned();
        match descriptor {
            Some(descriptor) => descriptor.effective_size(self.default_size()),
            None => f32::NAN,
        }
    }

    /// Size used by descriptors without an explicit size.
    pub fn default_size(&self) -> f32 {
        self.inner.default_size.get()
    }

    /// Change the default size. A different value raises the structural
    /// dirty flag.
    pub fn set_default_size(&self, size: f32) {
        if self.inner.default_size.set(size) {
            tracing::debug!(target: targets::MODEL, axis = %self.inner.axis, size, "default size changed");
            self.inner.dirty.set_dirty();
        }
    }

    // =========================================================================
    // Dirty tracking
    // =========================================================================

    /// Returns `true` if the layout needs to be recomputed.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.is_dirty()
    }

    /// Returns `true` if cell content needs to be rebuilt.
    pub fn are_builders_dirty(&self) -> bool {
        self.inner.builder_dirty.is_dirty()
    }

    /// Acknowledge the structural flag.
    pub fn set_clean(&self) {
        self.inner.dirty.set_clean();
    }

    /// Acknowledge the builder flag.
    pub fn set_builders_clean(&self) {
        self.inner.builder_dirty.set_clean();
    }

    /// The structural dirty flag.
    pub fn dirty(&self) -> &DirtyClean {
        &self.inner.dirty
    }

    /// The builder dirty flag.
    pub fn builder_dirty(&self) -> &DirtyClean {
        &self.inner.builder_dirty
    }

    // =========================================================================
    // Notification
    // =========================================================================

    /// Raise both dirty flags and publish a change event.
    pub(crate) fn set_descriptors_dirty(&self, change: StructuralChange) {
        self.inner.dirty.set_dirty();
        self.inner.builder_dirty.set_dirty();
        self.inner.event_loop.fire(GridEvent::RowColChange(RowColEvent {
            axis: self.inner.axis,
            change,
        }));
    }

    pub(crate) fn after_mutation(&self, selection_changed: bool, change: StructuralChange) {
        if selection_changed {
            self.inner.selection_changed.schedule();
        }
        self.set_descriptors_dirty(change);
    }

    pub(crate) fn release_classes(&self, tokens: Vec<CellClassId>) {
        for id in tokens {
            self.inner.cell_classes.remove(id);
        }
    }
}

/// Plan a single-source move. `None` means nothing to do.
fn plan_single_move(
    descriptors: &[Descriptor],
    from: usize,
    target: usize,
) -> Option<(Vec<Descriptor>, Vec<Descriptor>)> {
    if from >= descriptors.len() {
        return None;
    }
    let mut next = descriptors.to_vec();
    let moved = next.remove(from);
    let target = target.min(next.len());
    next.insert(target, moved);
    let reported = vec![next[from].clone(), next[target].clone()];
    Some((next, reported))
}

/// Plan a block move. `None` means nothing to do.
fn plan_block_move(
    descriptors: &[Descriptor],
    mut sources: Vec<usize>,
    target: usize,
    mut after: bool,
) -> Option<(Vec<Descriptor>, Vec<Descriptor>)> {
    sources.sort_unstable();
    sources.dedup();
    sources.retain(|&index| index < descriptors.len());
    if sources.is_empty() {
        return None;
    }

    let mut anchor_index = Some(target);
    while let Some(index) = anchor_index {
        if sources.binary_search(&index).is_err() {
            break;
        }
        anchor_index = index.checked_sub(1);
        after = true;
    }
    let anchor = anchor_index.and_then(|index| descriptors.get(index)).cloned();

    let mut next = descriptors.to_vec();
    let mut moved: Vec<Descriptor> = sources.iter().rev().map(|&index| next.remove(index)).collect();
    moved.reverse();

    let insert_at = match (&anchor, anchor_index) {
        (Some(anchor), _) => next
            .iter()
            .position(|d| d.ptr_eq(anchor))
            .map_or(0, |position| position + usize::from(after)),
        (None, None) => 0,
        (None, Some(_)) => next.len(),
    };
    next.splice(insert_at..insert_at, moved.iter().cloned());

    let mut reported = moved;
    reported.extend(anchor);
    Some((next, reported))
}

impl fmt::Debug for RowColModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sequence = self.sequence();
        f.debug_struct("RowColModel")
            .field("axis", &self.inner.axis)
            .field("length", &sequence.descriptors.len())
            .field("num_headers", &sequence.num_headers)
            .field("num_fixed", &sequence.num_fixed)
            .field("selected", &sequence.selected)
            .field("dirty", &self.inner.dirty.is_dirty())
            .finish()
    }
}

static_assertions::assert_impl_all!(RowColModel: Send, Sync);
static_assertions::assert_impl_all!(Descriptor: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::cell_class::CellClassRegistry;
    use crate::model::event::Action;

    fn model(axis: Axis) -> RowColModel {
        RowColModel::new(axis, Arc::new(EventLoop::new()), Arc::new(CellClassRegistry::new()))
    }

    fn fill(model: &RowColModel, count: usize) -> Vec<Descriptor> {
        let descriptors: Vec<Descriptor> = (0..count).map(|_| model.create(None)).collect();
        model.add(descriptors.clone()).unwrap();
        descriptors
    }

    fn fixed(model: &RowColModel) -> Descriptor {
        let descriptor = model.create(None);
        descriptor.set_fixed(true);
        descriptor
    }

    fn actions(model: &RowColModel) -> Arc<parking_lot::Mutex<Vec<(Action, usize)>>> {
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = log.clone();
        model.event_loop().connect(move |event: &GridEvent| {
            if let Some(change) = event.as_change() {
                sink.lock().push((change.action(), change.descriptors().len()));
            }
        });
        log
    }

    #[test]
    fn test_add_assigns_indices() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 3);

        assert_eq!(rows.length(false), 3);
        for (position, descriptor) in added.iter().enumerate() {
            assert_eq!(descriptor.index(), Some(position));
        }
    }

    #[test]
    fn test_headers_go_to_prefix() {
        let rows = model(Axis::Row);
        fill(&rows, 2);
        let header = rows.create(None);
        rows.add_headers([header.clone()]).unwrap();

        assert_eq!(rows.num_headers(), 1);
        assert_eq!(rows.num_fixed(false), 1);
        assert_eq!(rows.num_fixed(true), 0);
        assert_eq!(rows.get(0, false), Some(header));
        assert_eq!(rows.length(false), 2);
        assert_eq!(rows.length(true), 3);
    }

    #[test]
    fn test_fixed_after_unfixed_rejected() {
        let cols = model(Axis::Col);
        fill(&cols, 1);
        let log = actions(&cols);

        let err = cols.add([fixed(&cols)]).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::FixedAfterUnfixed, 0));
        assert_eq!(cols.length(true), 1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let cols = model(Axis::Col);
        let batch = vec![fixed(&cols), cols.create(None), fixed(&cols)];

        let err = cols.add(batch.clone()).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::FixedAfterUnfixed, 2));
        assert!(cols.is_empty());
        assert!(batch.iter().all(|d| d.index().is_none()));
    }

    #[test]
    fn test_add_twice_rejected() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 1);

        let err = rows.add(added).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::AlreadyInSequence, 0));

        let fresh = rows.create(None);
        let err = rows.add([fresh.clone(), fresh]).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::AlreadyInSequence, 1));
        assert_eq!(rows.length(true), 1);
    }

    #[test]
    fn test_fixed_block_follows_headers() {
        let cols = model(Axis::Col);
        let header = cols.create(None);
        cols.add_headers([header]).unwrap();
        cols.add([fixed(&cols), fixed(&cols), cols.create(None)]).unwrap();

        assert_eq!(cols.num_fixed(false), 3);
        assert_eq!(cols.num_fixed(true), 2);
    }

    #[test]
    fn test_remove() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 3);
        let log = actions(&rows);

        assert!(rows.remove(&added[1], false));
        assert!(!rows.remove(&added[1], false));

        assert_eq!(added[1].index(), None);
        assert_eq!(added[2].index(), Some(1));
        assert_eq!(*log.lock(), vec![(Action::Remove, 1)]);
    }

    #[test]
    fn test_suppressed_remove_then_reindex() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 4);
        let log = actions(&rows);

        assert!(rows.remove(&added[0], true));
        assert!(rows.remove(&added[1], true));
        assert!(log.lock().is_empty());

        rows.reindex();
        assert_eq!(added[2].index(), Some(0));
        assert_eq!(added[3].index(), Some(1));
    }

    #[test]
    fn test_remove_fixed_updates_counters() {
        let cols = model(Axis::Col);
        let pinned = fixed(&cols);
        cols.add([pinned.clone(), cols.create(None)]).unwrap();

        cols.remove(&pinned, false);
        assert_eq!(cols.num_fixed(false), 0);
    }

    #[test]
    fn test_clear_keeps_headers() {
        let rows = model(Axis::Row);
        rows.add_headers([rows.create(None)]).unwrap();
        rows.add([fixed(&rows)]).unwrap();
        fill(&rows, 2);
        let log = actions(&rows);

        rows.clear(false);
        assert_eq!(rows.length(true), 1);
        assert_eq!(rows.num_headers(), 1);
        assert_eq!(rows.num_fixed(false), 1);
        assert_eq!(*log.lock(), vec![(Action::Remove, 3)]);

        rows.clear(true);
        assert!(rows.is_empty());
        assert_eq!(rows.num_fixed(false), 0);

        rows.clear(true);
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_single_move() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 4);
        let log = actions(&rows);

        rows.move_to([0], 2, false).unwrap();

        let order = rows.descriptors();
        assert_eq!(order, vec![added[1].clone(), added[2].clone(), added[0].clone(), added[3].clone()]);
        assert!(order.iter().enumerate().all(|(i, d)| d.index() == Some(i)));
        assert_eq!(*log.lock(), vec![(Action::Move, 2)]);
    }

    #[test]
    fn test_single_move_out_of_range() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 3);

        rows.move_to([7], 0, false).unwrap();
        assert_eq!(rows.descriptors(), added);

        rows.move_to([0], 99, false).unwrap();
        assert_eq!(rows.get(2, false), Some(added[0].clone()));
    }

    #[test]
    fn test_block_move_to_front() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 5);
        let log = actions(&rows);

        rows.move_to([3, 1], 0, true).unwrap();

        let order = rows.descriptors();
        assert_eq!(
            order,
            vec![
                added[0].clone(),
                added[1].clone(),
                added[3].clone(),
                added[2].clone(),
                added[4].clone(),
            ]
        );
        assert_eq!(*log.lock(), vec![(Action::Move, 3)]);
    }

    #[test]
    fn test_block_move_target_is_source() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 5);

        // The anchor steps back to index 1 and the block lands after it.
        rows.move_to([2, 4], 2, false).unwrap();
        assert_eq!(
            rows.descriptors(),
            vec![
                added[0].clone(),
                added[1].clone(),
                added[2].clone(),
                added[4].clone(),
                added[3].clone(),
            ]
        );

        // No anchor left: the block goes to the front.
        rows.move_to([0, 1, 3], 1, false).unwrap();
        assert_eq!(rows.get(0, false), Some(added[0].clone()));
        assert_eq!(rows.get(2, false), Some(added[4].clone()));
    }

    #[test]
    fn test_block_move_past_end_appends() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 4);

        rows.move_to([0, 1], 10, false).unwrap();
        assert_eq!(
            rows.descriptors(),
            vec![added[2].clone(), added[3].clone(), added[0].clone(), added[1].clone()]
        );
    }

    #[test]
    fn test_move_cannot_break_layout() {
        let cols = model(Axis::Col);
        cols.add_headers([cols.create(None)]).unwrap();
        cols.add([fixed(&cols)]).unwrap();
        let added = fill(&cols, 2);
        let before = cols.descriptors();

        let err = cols.move_to([0], 3, false).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::HeaderOutsidePrefix, 3));

        let err = cols.move_to([1], 3, false).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::FixedOutsideBlock, 3));

        let err = cols.move_to([2, 3], 0, false).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::HeaderOutsidePrefix, 2));

        assert_eq!(cols.descriptors(), before);
        assert_eq!(added[1].index(), Some(3));
    }

    #[test]
    fn test_empty_operations_are_noops() {
        let rows = model(Axis::Row);
        let log = actions(&rows);

        rows.add(Vec::new()).unwrap();
        rows.move_to(Vec::new(), 0, false).unwrap();
        rows.clear(true);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_size_of() {
        let rows = RowColModel::builder(Axis::Row)
            .default_size(20.0)
            .build(Arc::new(EventLoop::new()), Arc::new(CellClassRegistry::new()));
        let added = fill(&rows, 2);

        assert_eq!(rows.size_of(0), 20.0);
        added[1].set_size(Some(44.0));
        assert_eq!(rows.size_of(1), 44.0);
        added[1].set_hidden(true);
        assert_eq!(rows.size_of(1), 0.0);
        assert!(rows.size_of(2).is_nan());
    }

    #[test]
    fn test_resize_and_hide_events() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 1);
        rows.set_clean();
        rows.set_builders_clean();
        let log = actions(&rows);

        added[0].set_size(Some(10.0));
        added[0].set_size(Some(10.0));
        added[0].set_hidden(true);

        assert!(rows.is_dirty());
        assert!(rows.are_builders_dirty());
        assert_eq!(*log.lock(), vec![(Action::Size, 1), (Action::Hide, 1)]);
    }

    #[test]
    fn test_builder_change_marks_only_builders() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 1);
        rows.set_clean();
        rows.set_builders_clean();

        let builder = rows.create_builder(Arc::new(|| None), None);
        added[0].set_builder(Some(builder));

        assert!(!rows.is_dirty());
        assert!(rows.are_builders_dirty());
    }

    #[test]
    fn test_default_size_marks_dirty() {
        let cols = model(Axis::Col);
        assert_eq!(cols.default_size(), 100.0);
        cols.set_clean();

        let flips = Arc::new(AtomicUsize::new(0));
        let counter = flips.clone();
        cols.dirty().changed.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cols.set_default_size(100.0);
        assert!(!cols.is_dirty());
        cols.set_default_size(80.0);
        assert!(cols.is_dirty());
        assert_eq!(flips.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_index_conversions() {
        let rows = model(Axis::Row);
        rows.add_headers([rows.create(None), rows.create(None)]).unwrap();
        let added = fill(&rows, 2);

        assert_eq!(rows.to_virtual(0), 2);
        assert_eq!(rows.to_data(2), 0);
        assert_eq!(rows.to_data(0), -2);
        assert_eq!(rows.data(1), Some(added[1].clone()));
        assert_eq!(rows.get(1, true), rows.get(3, false));
        assert!(rows.get(2, true).is_none());
    }

    #[test]
    fn test_position_of_survives_stale_hint() {
        let rows = model(Axis::Row);
        let added = fill(&rows, 3);
        rows.remove(&added[0], true);

        assert_eq!(rows.position_of(&added[2]), Some(1));
    }

    #[test]
    fn test_foreign_descriptor_rejected() {
        let event_loop = Arc::new(EventLoop::new());
        let registry: Arc<dyn CellClasses> = Arc::new(CellClassRegistry::new());
        let rows = RowColModel::new(Axis::Row, event_loop.clone(), registry.clone());
        let other_rows = RowColModel::new(Axis::Row, event_loop.clone(), registry.clone());
        let cols = RowColModel::new(Axis::Col, event_loop, registry);
        let log = actions(&rows);

        let err = rows.add([rows.create(None), cols.create(None)]).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::ForeignDescriptor, 1));

        let err = rows.add([other_rows.create(None)]).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::ForeignDescriptor, 0));

        let foreign_header = cols.create(None);
        let err = rows.add_headers([foreign_header.clone()]).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::ForeignDescriptor, 0));
        assert!(!foreign_header.is_header());

        assert!(rows.is_empty());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_failed_add_headers_leaves_flags() {
        let rows = model(Axis::Row);
        let header = rows.create(None);

        let err = rows.add_headers([header.clone(), header.clone()]).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::AlreadyInSequence, 1));
        assert!(!header.is_header());
        assert!(!header.is_fixed());

        rows.add([header.clone()]).unwrap();
        assert_eq!(rows.num_headers(), 0);
        assert_eq!(rows.length(false), 1);
    }

    #[test]
    fn test_failed_add_headers_keeps_existing_headers() {
        let rows = model(Axis::Row);
        let already = rows.create(None);
        already.set_header(true);
        let placed = fill(&rows, 1);

        let err = rows.add_headers([already.clone(), placed[0].clone()]).unwrap_err();
        assert_eq!(err, RowColError::violation(Violation::AlreadyInSequence, 1));
        assert!(already.is_header());
        assert!(!placed[0].is_header());
    }
}
