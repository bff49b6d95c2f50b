//! Trellis - row and column models for interactive data grids.
//!
//! A grid is laid out along two axes. For each axis, a [`RowColModel`] keeps
//! the ordered [`Descriptor`]s (one per row or column) together with the
//! bookkeeping a renderer needs:
//!
//! - **Structure**: header prefix, fixed block, add/remove/move with the
//!   layout enforced
//! - **Selection**: data-space selection with debounced change notification
//! - **Sizing**: explicit sizes, hidden descriptors and a model default
//! - **Expansion**: descriptors with children splice them in and out
//! - **Dirty tracking**: separate layout and cell-content flags
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//!
//! let grid = GridModels::new();
//! let rows = grid.rows();
//!
//! rows.add_headers([rows.create(None)])?;
//! rows.add((0..3).map(|_| rows.create(None)))?;
//! rows.select([0, 2], false);
//!
//! assert_eq!(rows.length(false), 3);
//! assert_eq!(rows.selected(), vec![0, 2]);
//!
//! // Deliver the debounced selection notification.
//! grid.process_tasks();
//! # Ok::<(), trellis::RowColError>(())
//! ```

mod error;
mod grid;
pub mod model;
pub mod prelude;

pub use error::{Result, RowColError, Violation};
pub use grid::GridModels;
pub use model::{
    Action, Axis, Builder, BuiltElement, CellClassId, CellClassRegistry, CellClassSpec,
    CellClasses, CoordinateSpace, Descriptor, Extent, GridEvent, RenderFn, RowColConfig,
    RowColEvent, RowColModel, RowColModelBuilder, StructuralChange, UpdateFn,
};
pub use trellis_core::{ConnectionId, DirtyClean, EventLoop, Signal};
