//! Two-state clean/dirty flags.
//!
//! A renderer polls a [`DirtyClean`] once per frame: when it reports dirty the
//! renderer rebuilds whatever the flag guards and then calls
//! [`DirtyClean::set_clean`]. Flags start out dirty so the first frame always
//! builds.

use crate::property::Property;
use crate::signal::Signal;

/// A clean/dirty flag with change notification.
///
/// # Signals
///
/// - `changed(bool)`: Emitted with the new state whenever the flag flips.
#[derive(Debug)]
pub struct DirtyClean {
    dirty: Property<bool>,
    /// Emitted when the flag flips between clean and dirty.
    pub changed: Signal<bool>,
}

impl Default for DirtyClean {
    fn default() -> Self {
        Self::new()
    }
}

impl DirtyClean {
    /// Create a new flag in the dirty state.
    pub fn new() -> Self {
        Self {
            dirty: Property::new(true),
            changed: Signal::new(),
        }
    }

    /// Returns `true` if the guarded state needs rebuilding.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Returns `true` if nothing changed since the last [`set_clean`](Self::set_clean).
    pub fn is_clean(&self) -> bool {
        !self.is_dirty()
    }

    /// Mark the guarded state as needing a rebuild.
    pub fn set_dirty(&self) {
        if self.dirty.set(true) {
            self.changed.emit(true);
        }
    }

    /// Mark the guarded state as rebuilt.
    pub fn set_clean(&self) {
        if self.dirty.set(false) {
            self.changed.emit(false);
        }
    }
}
