//! Prelude module for Trellis.
//!
//! ```ignore
//! use trellis::prelude::*;
//! ```

// ============================================================================
// Models
// ============================================================================

pub use crate::GridModels;
pub use crate::model::{Axis, Descriptor, RowColConfig, RowColModel};

// ============================================================================
// Events and Signals
// ============================================================================

pub use crate::model::{Action, GridEvent, RowColEvent, StructuralChange};
pub use trellis_core::{DirtyClean, EventLoop, Signal};

// ============================================================================
// Cell Classes
// ============================================================================

pub use crate::model::{CellClassRegistry, CellClassSpec, CellClasses};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{RowColError, Violation};
