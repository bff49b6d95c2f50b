//! Render callbacks attached to descriptors.
//!
//! The model never calls a [`Builder`]; it only stores one per descriptor and
//! raises the builder dirty flag when it is replaced, so a renderer knows to
//! rebuild cell content without relaying out the grid.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque element produced by a builder, owned by the renderer.
pub type BuiltElement = Box<dyn Any + Send>;

/// Produces a fresh element for a cell.
pub type RenderFn = Arc<dyn Fn() -> Option<BuiltElement> + Send + Sync>;

/// Refreshes a previously rendered element.
pub type UpdateFn = Arc<dyn Fn(BuiltElement) -> Option<BuiltElement> + Send + Sync>;

/// A `{ render, update }` callback pair.
#[derive(Clone)]
pub struct Builder {
    render: RenderFn,
    update: UpdateFn,
}

impl Builder {
    /// Create a builder. Without `update`, rendered elements pass through unchanged.
    pub fn new(render: RenderFn, update: Option<UpdateFn>) -> Self {
        Self {
            render,
            update: update.unwrap_or_else(|| Arc::new(pass_through)),
        }
    }

    /// Create a builder from closures.
    pub fn from_fns<R, U>(render: R, update: U) -> Self
    where
        R: Fn() -> Option<BuiltElement> + Send + Sync + 'static,
        U: Fn(BuiltElement) -> Option<BuiltElement> + Send + Sync + 'static,
    {
        Self {
            render: Arc::new(render),
            update: Arc::new(update),
        }
    }

    /// Render a new element.
    pub fn render(&self) -> Option<BuiltElement> {
        (self.render)()
    }

    /// Update an existing element.
    pub fn update(&self, element: BuiltElement) -> Option<BuiltElement> {
        (self.update)(element)
    }

    /// Returns `true` if both builders share the same callbacks.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.render, &other.render) && Arc::ptr_eq(&self.update, &other.update)
    }
}

fn pass_through(element: BuiltElement) -> Option<BuiltElement> {
    Some(element)
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder").finish_non_exhaustive()
    }
}
