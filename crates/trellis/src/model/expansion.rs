//! Expanding and collapsing descriptors with children.
//!
//! Expanding splices a descriptor's children into the sequence right after
//! it and registers a marker class across the opposite axis. Collapsing
//! removes as many following descriptors as the expansion inserted. The
//! children list itself is never touched, so re-expanding splices the same
//! descriptors again.

use std::collections::HashSet;

use trellis_core::logging::targets;

use super::axis::Axis;
use super::cell_class::{CellClassId, CellClassSpec, CoordinateSpace, Extent};
use super::descriptor::Descriptor;
use super::event::StructuralChange;
use super::row_col::{RowColModel, check_layout};
use crate::error::{Result, RowColError, Violation};

impl RowColModel {
    /// Expand or collapse a descriptor of this model.
    ///
    /// Returns `Ok(true)` if the expansion state changed. Descriptors without
    /// children, headers, descriptors outside this model and requests for the
    /// current state are no-ops returning `Ok(false)`.
    ///
    /// # Errors
    ///
    /// [`RowColError::StructuralConstraintViolation`] if splicing the
    /// children would break the `[headers][fixed][normal]` layout, or a child
    /// is already part of a sequence or was created by another model.
    /// Nothing changes on error.
    ///
    /// The expansion marker records the parent's position when it expands.
    /// Later moves, additions or removals do not reposition it.
    pub fn set_expanded(&self, descriptor: &Descriptor, expanded: bool) -> Result<bool> {
        if descriptor.is_expanded() == expanded {
            return Ok(false);
        }
        if expanded {
            self.expand(descriptor)
        } else {
            Ok(self.collapse(descriptor))
        }
    }

    fn expand(&self, descriptor: &Descriptor) -> Result<bool> {
        let Some(children) = descriptor.children() else {
            return Ok(false);
        };
        if descriptor.is_header() {
            tracing::debug!(target: targets::MODEL, axis = %self.axis(), "headers cannot expand");
            return Ok(false);
        }

        let (position, selection_changed) = {
            let mut sequence = self.sequence();
            let Some(position) = sequence.position_of(descriptor) else {
                return Ok(false);
            };
            let insert_at = position + 1;

            let mut seen = HashSet::with_capacity(children.len());
            for (offset, child) in children.iter().enumerate() {
                if !child.is_owned_by(&self.inner) {
                    return Err(RowColError::violation(
                        Violation::ForeignDescriptor,
                        insert_at + offset,
                    ));
                }
                if child.index().is_some() || child.ptr_eq(descriptor) || !seen.insert(child.clone()) {
                    return Err(RowColError::violation(
                        Violation::AlreadyInSequence,
                        insert_at + offset,
                    ));
                }
            }

            let mut next = sequence.descriptors.clone();
            next.splice(insert_at..insert_at, children.iter().cloned());
            if let Err(err) = check_layout(&next) {
                tracing::warn!(target: targets::MODEL, axis = %self.axis(), %err, "rejected expansion");
                return Err(err);
            }

            sequence.descriptors = next;
            sequence.recount();
            descriptor.set_expansion(true, children.len());
            (position, sequence.reindex())
        };

        tracing::debug!(target: targets::MODEL, axis = %self.axis(), position, children = children.len(), "descriptor expanded");
        self.after_mutation(selection_changed, StructuralChange::Add(children));

        let cell_classes = self.cell_classes();
        let id = cell_classes.create(self.expanded_spec(position));
        cell_classes.add(id);
        if let Some(previous) = descriptor.replace_expanded_class(Some(id)) {
            cell_classes.remove(previous);
        }
        Ok(true)
    }

    fn collapse(&self, descriptor: &Descriptor) -> bool {
        let (removed, tokens, selection_changed) = {
            let mut sequence = self.sequence();
            let Some(position) = sequence.position_of(descriptor) else {
                return false;
            };
            let start = position + 1;
            let end = (start + descriptor.expanded_count()).min(sequence.descriptors.len());

            let removed: Vec<Descriptor> = (start..end).map(|_| sequence.splice_out(start)).collect();
            let mut tokens: Vec<CellClassId> = removed.iter().flat_map(Descriptor::detach).collect();
            descriptor.set_expansion(false, 0);
            tokens.extend(descriptor.replace_expanded_class(None));
            (removed, tokens, sequence.reindex())
        };

        self.release_classes(tokens);
        tracing::debug!(target: targets::MODEL, axis = %self.axis(), removed = removed.len(), "descriptor collapsed");
        self.after_mutation(selection_changed, StructuralChange::Remove(removed));
        true
    }

    fn expanded_spec(&self, position: usize) -> CellClassSpec {
        let position = position as isize;
        let class_name = self.config().expanded_class.clone();
        let spec = match self.axis() {
            Axis::Row => CellClassSpec::new(position, 0, class_name)
                .with_extent(Extent::Cells(1), Extent::Unbounded),
            Axis::Col => CellClassSpec::new(0, position, class_name)
                .with_extent(Extent::Unbounded, Extent::Cells(1)),
        };
        spec.in_space(CoordinateSpace::Virtual)
    }
}
