//! Events published by row/column models.

use std::slice;

use super::axis::Axis;
use super::descriptor::Descriptor;

/// The kind of structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Descriptors entered the sequence.
    Add,
    /// Descriptors left the sequence.
    Remove,
    /// Descriptors changed position.
    Move,
    /// A descriptor was hidden or shown.
    Hide,
    /// A descriptor was resized.
    Size,
}

impl Action {
    /// Lowercase action name (`"add"`, `"remove"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Move => "move",
            Self::Hide => "hide",
            Self::Size => "size",
        }
    }
}

/// A structural, size or visibility change with the descriptors it touched.
#[derive(Debug, Clone)]
pub enum StructuralChange {
    /// Descriptors added, in batch order.
    Add(Vec<Descriptor>),
    /// Descriptors removed.
    Remove(Vec<Descriptor>),
    /// Moved descriptors, followed by the anchor they were moved next to.
    Move(Vec<Descriptor>),
    /// A descriptor whose hidden flag changed.
    Hide(Descriptor),
    /// A descriptor whose size changed.
    Resize(Descriptor),
}

impl StructuralChange {
    /// The action this change represents.
    pub fn action(&self) -> Action {
        match self {
            Self::Add(_) => Action::Add,
            Self::Remove(_) => Action::Remove,
            Self::Move(_) => Action::Move,
            Self::Hide(_) => Action::Hide,
            Self::Resize(_) => Action::Size,
        }
    }

    /// The descriptors carried by this change.
    pub fn descriptors(&self) -> &[Descriptor] {
        match self {
            Self::Add(list) | Self::Remove(list) | Self::Move(list) => list,
            Self::Hide(descriptor) | Self::Resize(descriptor) => slice::from_ref(descriptor),
        }
    }
}

/// A change event for one axis.
#[derive(Debug, Clone)]
pub struct RowColEvent {
    /// The axis whose model changed.
    pub axis: Axis,
    /// What changed.
    pub change: StructuralChange,
}

impl RowColEvent {
    /// Event type string, `grid-<axis>-change`.
    pub fn event_type(&self) -> &'static str {
        self.axis.change_event_type()
    }

    /// Shorthand for `self.change.action()`.
    pub fn action(&self) -> Action {
        self.change.action()
    }

    /// Shorthand for `self.change.descriptors()`.
    pub fn descriptors(&self) -> &[Descriptor] {
        self.change.descriptors()
    }
}

/// Everything a row/column model publishes on its event loop.
#[derive(Debug, Clone)]
pub enum GridEvent {
    /// Structure, size or visibility changed.
    RowColChange(RowColEvent),
    /// The selection settled after a burst of changes.
    SelectionChange {
        /// The axis whose selection changed.
        axis: Axis,
    },
}

impl GridEvent {
    /// Event type string, `grid-<axis>-change` or `grid-<axis>-selection-change`.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RowColChange(event) => event.event_type(),
            Self::SelectionChange { axis } => axis.selection_event_type(),
        }
    }

    /// The axis the event belongs to.
    pub fn axis(&self) -> Axis {
        match self {
            Self::RowColChange(event) => event.axis,
            Self::SelectionChange { axis } => *axis,
        }
    }

    /// The structural payload, if this is a change event.
    pub fn as_change(&self) -> Option<&RowColEvent> {
        match self {
            Self::RowColChange(event) => Some(event),
            Self::SelectionChange { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        assert_eq!(Action::Add.as_str(), "add");
        assert_eq!(Action::Size.as_str(), "size");
        assert_eq!(StructuralChange::Move(Vec::new()).action(), Action::Move);
        assert!(StructuralChange::Remove(Vec::new()).descriptors().is_empty());
    }

    #[test]
    fn test_event_types() {
        let selection = GridEvent::SelectionChange { axis: Axis::Col };
        assert_eq!(selection.event_type(), "grid-col-selection-change");
        assert_eq!(selection.axis(), Axis::Col);
        assert!(selection.as_change().is_none());

        let change = GridEvent::RowColChange(RowColEvent {
            axis: Axis::Row,
            change: StructuralChange::Add(Vec::new()),
        });
        assert_eq!(change.event_type(), "grid-row-change");
        assert_eq!(change.as_change().map(RowColEvent::action), Some(Action::Add));
    }
}
