//! The mutable scene model: the ordered part list, selection and assembly
//! progress.
//!
//! Part order is significant: the index of a part in the sequence feeds the
//! angular spread formula used during disassembly, so parts are only ever
//! appended and the sequence is never reordered. The model holds references
//! only; creation and destruction of the underlying resources is the job of
//! the resource lifecycle manager.

use crate::data_structures::part::Part;

#[derive(Debug, Default)]
pub struct SceneModel {
    parts: Vec<Part>,
    selected: Option<usize>,
    assembly_progress: f64,
}

impl SceneModel {
    /// A fresh scene starts fully assembled.
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            selected: None,
            assembly_progress: 1.0,
        }
    }

    /// Append a part. Order is preserved for the spread pattern.
    pub fn add_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Drain all parts out of the model, clearing the selection.
    ///
    /// The caller (the lifecycle manager) is responsible for disposing each
    /// drained part before dropping it; the model never releases resources
    /// itself.
    pub fn take_parts(&mut self) -> Vec<Part> {
        self.selected = None;
        std::mem::take(&mut self.parts)
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut [Part] {
        &mut self.parts
    }

    pub fn find(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Part> {
        self.parts.iter_mut().find(|part| part.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parts.iter().position(|part| part.name == name)
    }

    /// Clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f64) {
        self.assembly_progress = progress.clamp(0.0, 1.0);
    }

    pub fn progress(&self) -> f64 {
        self.assembly_progress
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_selected(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    pub fn selected_part(&self) -> Option<&Part> {
        self.selected.and_then(|idx| self.parts.get(idx))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
