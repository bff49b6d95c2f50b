//! Core systems for Trellis.
//!
//! This crate provides the foundational plumbing the grid model is built on:
//!
//! - **Signal/Slot System**: Type-safe publish/subscribe notification
//! - **Property System**: Change-detecting value cells
//! - **Dirty Flags**: Two-state clean/dirty signals for renderers
//! - **Task Queue**: Deferred tasks drained at the end of a tick
//! - **Debouncer**: Single-slot coalescing of bursts of notifications
//! - **Event Loop**: Typed event channel plus the deferred task queue
//!
//! # Signal/Slot Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Dirty Flag Example
//!
//! ```
//! use trellis_core::DirtyClean;
//!
//! let layout = DirtyClean::new();
//! assert!(layout.is_dirty()); // first frame always builds
//! layout.set_clean();
//! layout.set_dirty();
//! assert!(layout.is_dirty());
//! ```

mod debounce;
mod dirty;
mod error;
mod event_loop;
pub mod logging;
pub mod property;
pub mod signal;
mod task;

pub use debounce::Debouncer;
pub use dirty::DirtyClean;
pub use error::{CoreError, Result};
pub use event_loop::EventLoop;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};
