//! Descriptor selection.
//!
//! Selection is addressed in data space. Each selected descriptor carries a
//! drag-ready cell class spanning the opposite axis, registered with the
//! model's [`CellClasses`](super::CellClasses) collaborator and released on
//! deselection or removal.
//!
//! Selection changes are reported through a debounced
//! [`GridEvent::SelectionChange`](super::GridEvent::SelectionChange): however
//! many calls happen before the host drains the event loop, one event fires.

use trellis_core::logging::targets;

use super::axis::Axis;
use super::cell_class::{CellClassId, CellClassSpec, CoordinateSpace, Extent};
use super::descriptor::Descriptor;
use super::row_col::RowColModel;

impl RowColModel {
    /// Select descriptors by data index.
    ///
    /// Missing indices are logged and skipped. Descriptors that are already
    /// selected or not selectable are skipped silently. Unless
    /// `suppress_event`, a selection notification is scheduled if anything
    /// changed.
    ///
    /// The drag-ready class covers the line at the data index it was
    /// selected at. It is not repositioned when later structural changes
    /// move the descriptor; it is released on deselection or removal.
    pub fn select<I>(&self, indices: I, suppress_event: bool)
    where
        I: IntoIterator<Item = usize>,
    {
        let newly_selected: Vec<(usize, Descriptor)> = {
            let mut sequence = self.sequence();
            let mut newly_selected = Vec::new();
            for index in indices {
                let Some(descriptor) = sequence.data(index).cloned() else {
                    tracing::warn!(target: targets::MODEL, axis = %self.axis(), index, "cannot select missing descriptor");
                    continue;
                };
                if descriptor.is_selected() || !descriptor.is_selectable() {
                    continue;
                }
                descriptor.set_selected(true);
                sequence.selected.insert(index);
                newly_selected.push((index, descriptor));
            }
            newly_selected
        };

        if newly_selected.is_empty() {
            return;
        }

        let cell_classes = self.cell_classes();
        for (index, descriptor) in &newly_selected {
            let id = cell_classes.create(self.drag_ready_spec(*index));
            cell_classes.add(id);
            if let Some(previous) = descriptor.replace_drag_ready_class(Some(id)) {
                cell_classes.remove(previous);
            }
        }

        tracing::trace!(target: targets::MODEL, axis = %self.axis(), count = newly_selected.len(), "descriptors selected");
        if !suppress_event {
            self.inner.selection_changed.schedule();
        }
    }

    /// Deselect descriptors by data index.
    ///
    /// Missing indices are logged and skipped. Drag-ready classes are
    /// released even for descriptors that were not selected.
    pub fn deselect<I>(&self, indices: I, suppress_event: bool)
    where
        I: IntoIterator<Item = usize>,
    {
        let (tokens, changed): (Vec<CellClassId>, usize) = {
            let mut sequence = self.sequence();
            let mut tokens = Vec::new();
            let mut changed = 0;
            for index in indices {
                let Some(descriptor) = sequence.data(index).cloned() else {
                    tracing::warn!(target: targets::MODEL, axis = %self.axis(), index, "cannot deselect missing descriptor");
                    continue;
                };
                if descriptor.is_selected() {
                    descriptor.set_selected(false);
                    sequence.selected.remove(&index);
                    changed += 1;
                }
                tokens.extend(descriptor.replace_drag_ready_class(None));
            }
            (tokens, changed)
        };

        self.release_classes(tokens);
        if changed > 0 {
            tracing::trace!(target: targets::MODEL, axis = %self.axis(), count = changed, "descriptors deselected");
            if !suppress_event {
                self.inner.selection_changed.schedule();
            }
        }
    }

    /// Flip the selection of one data index.
    pub fn toggle_select(&self, index: usize) {
        if self.is_selected(index) {
            self.deselect([index], false);
        } else {
            self.select([index], false);
        }
    }

    /// Deselect everything that is currently selected.
    pub fn clear_selected(&self) {
        let selected = self.selected();
        self.deselect(selected, false);
    }

    /// Selected data indices in ascending order.
    pub fn selected(&self) -> Vec<usize> {
        self.sequence().selected.iter().copied().collect()
    }

    /// Number of selected descriptors.
    pub fn selected_count(&self) -> usize {
        self.sequence().selected.len()
    }

    /// Returns `true` if the descriptor at a data index is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.sequence().selected.contains(&index)
    }

    /// Returns `true` if every data descriptor is selected.
    ///
    /// Trivially `true` for a model with no data descriptors.
    pub fn all_selected(&self) -> bool {
        let sequence = self.sequence();
        sequence.selected.len() == sequence.descriptors.len() - sequence.num_headers
    }

    fn drag_ready_spec(&self, index: usize) -> CellClassSpec {
        let index = index as isize;
        let class_name = self.config().drag_ready_class.clone();
        let spec = match self.axis() {
            Axis::Row => CellClassSpec::new(index, -1, class_name)
                .with_extent(Extent::Cells(1), Extent::Unbounded),
            Axis::Col => CellClassSpec::new(-1, index, class_name)
                .with_extent(Extent::Unbounded, Extent::Cells(1)),
        };
        spec.in_space(CoordinateSpace::Data)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use trellis_core::EventLoop;

    use crate::model::cell_class::CellClassRegistry;
    use crate::model::config::DRAG_READY_CLASS;
    use crate::model::event::GridEvent;

    use super::*;

    struct Fixture {
        model: RowColModel,
        registry: Arc<CellClassRegistry>,
        notifications: Arc<AtomicUsize>,
    }

    fn fixture(axis: Axis, count: usize) -> Fixture {
        let event_loop = Arc::new(EventLoop::new());
        let registry = Arc::new(CellClassRegistry::new());
        let model = RowColModel::new(axis, event_loop.clone(), registry.clone());
        model.add((0..count).map(|_| model.create(None))).unwrap();

        let notifications = Arc::new(AtomicUsize::new(0));
        let counter = notifications.clone();
        event_loop.connect(move |event: &GridEvent| {
            if matches!(event, GridEvent::SelectionChange { .. }) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        Fixture {
            model,
            registry,
            notifications,
        }
    }

    impl Fixture {
        fn drain(&self) -> usize {
            self.model.event_loop().process_tasks();
            self.notifications.swap(0, Ordering::SeqCst)
        }
    }

    #[test]
    fn test_select_and_deselect() {
        let f = fixture(Axis::Row, 4);

        f.model.select([0, 2], false);
        assert_eq!(f.model.selected(), vec![0, 2]);
        assert!(f.model.is_selected(2));
        assert!(f.model.data(2).unwrap().is_selected());
        assert_eq!(f.registry.active_count(), 2);

        f.model.deselect([0], false);
        assert_eq!(f.model.selected(), vec![2]);
        assert_eq!(f.registry.active_count(), 1);
        assert_eq!(f.drain(), 1);
    }

    #[test]
    fn test_burst_notifies_once() {
        let f = fixture(Axis::Col, 3);

        f.model.select([0, 2], false);
        f.model.clear_selected();
        assert!(f.model.selected().is_empty());
        assert_eq!(f.notifications.load(Ordering::SeqCst), 0);

        assert_eq!(f.drain(), 1);
        assert_eq!(f.drain(), 0);
    }

    #[test]
    fn test_suppressed_selection_does_not_notify() {
        let f = fixture(Axis::Row, 2);

        f.model.select([1], true);
        assert_eq!(f.model.selected(), vec![1]);
        assert_eq!(f.drain(), 0);
    }

    #[test]
    fn test_missing_and_unselectable_are_skipped() {
        let f = fixture(Axis::Row, 2);
        f.model.data(1).unwrap().set_selectable(false);

        f.model.select([1, 5], false);
        assert!(f.model.selected().is_empty());
        assert_eq!(f.registry.active_count(), 0);
        assert_eq!(f.drain(), 0);
    }

    #[test]
    fn test_reselect_is_noop() {
        let f = fixture(Axis::Row, 2);
        f.model.select([0], false);
        f.drain();

        f.model.select([0], false);
        assert_eq!(f.registry.count_named(DRAG_READY_CLASS), 1);
        assert_eq!(f.drain(), 0);
    }

    #[test]
    fn test_toggle_and_all_selected() {
        let f = fixture(Axis::Row, 2);
        assert!(!f.model.all_selected());

        f.model.toggle_select(0);
        f.model.toggle_select(1);
        assert!(f.model.all_selected());
        assert_eq!(f.model.selected_count(), 2);

        f.model.toggle_select(0);
        assert_eq!(f.model.selected(), vec![1]);
    }

    #[test]
    fn test_selection_skips_header_prefix() {
        let f = fixture(Axis::Row, 2);
        f.model.add_headers([f.model.create(None)]).unwrap();

        f.model.select([0], false);
        assert_eq!(f.model.get(1, false).map(|d| d.is_selected()), Some(true));
        assert!(!f.model.get(0, false).unwrap().is_selected());
    }

    #[test]
    fn test_drag_ready_spans_opposite_axis() {
        let rows = fixture(Axis::Row, 3);
        rows.model.select([1], false);
        let id = rows.model.data(1).unwrap().drag_ready_class().unwrap();
        let spec = rows.registry.get(id).unwrap();
        assert_eq!((spec.top, spec.left), (1, -1));
        assert_eq!(spec.width, Extent::Unbounded);
        assert_eq!(spec.class_name, DRAG_READY_CLASS);

        let cols = fixture(Axis::Col, 3);
        cols.model.select([2], false);
        let id = cols.model.data(2).unwrap().drag_ready_class().unwrap();
        let spec = cols.registry.get(id).unwrap();
        assert_eq!((spec.top, spec.left), (-1, 2));
        assert_eq!(spec.height, Extent::Unbounded);
    }

    #[test]
    fn test_move_carries_selection() {
        let f = fixture(Axis::Row, 3);
        f.model.select([0], false);
        f.drain();

        f.model.move_to([0], 2, false).unwrap();
        assert_eq!(f.model.selected(), vec![2]);
        assert_eq!(f.drain(), 1);
    }

    #[test]
    fn test_remove_clears_selection() {
        let f = fixture(Axis::Row, 3);
        f.model.select([1], false);
        let descriptor = f.model.data(1).unwrap();

        f.model.remove(&descriptor, false);
        assert!(!descriptor.is_selected());
        assert!(descriptor.drag_ready_class().is_none());
        assert!(f.model.selected().is_empty());
        assert_eq!(f.registry.active_count(), 0);
    }

    #[test]
    fn test_drag_ready_keeps_selected_position() {
        let f = fixture(Axis::Row, 3);
        f.model.select([0], false);
        let descriptor = f.model.data(0).unwrap();

        f.model.move_to([0], 2, false).unwrap();
        assert_eq!(descriptor.index(), Some(2));
        let id = descriptor.drag_ready_class().unwrap();
        assert_eq!(f.registry.get(id).unwrap().top, 0);

        f.model.deselect([2], false);
        assert_eq!(f.registry.active_count(), 0);
    }
}
