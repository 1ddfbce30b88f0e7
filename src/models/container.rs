//! Shared container behavior for entities owning sections
//!
//! Document and Section both own an ordered list of sections; this trait is
//! the single seam carrying the append/remove/find operations and the
//! sibling-name uniqueness invariant for both.

use uuid::Uuid;

use super::error::{StructuralError, StructuralResult};
use super::path::{TreePath, path_within};
use super::section::Section;

/// An entity owning an ordered list of child sections
pub trait SectionContainer {
    /// The ordered, owned child sections
    fn sections(&self) -> &[Section];

    /// Low-level mutable access; the default methods keep the invariants
    fn sections_vec_mut(&mut self) -> &mut Vec<Section>;

    /// Display name of the container, for error messages
    fn container_name(&self) -> &str;

    /// Append a child section, enforcing sibling-name uniqueness
    fn append_section(&mut self, section: Section) -> StructuralResult<()> {
        if self.sections().iter().any(|s| s.name == section.name) {
            return Err(StructuralError::DuplicateName {
                kind: "section",
                name: section.name,
            });
        }
        self.sections_vec_mut().push(section);
        Ok(())
    }

    /// Remove a child section by index
    fn remove_section(&mut self, index: usize) -> StructuralResult<Section> {
        let len = self.sections().len();
        if index >= len {
            return Err(StructuralError::IndexOutOfRange { index, len });
        }
        Ok(self.sections_vec_mut().remove(index))
    }

    /// Remove a child section by name
    fn remove_section_by_name(&mut self, name: &str) -> Option<Section> {
        let index = self.sections().iter().position(|s| s.name == name)?;
        Some(self.sections_vec_mut().remove(index))
    }

    /// Find a direct child section by name
    fn find_section(&self, name: &str) -> Option<&Section> {
        self.sections().iter().find(|s| s.name == name)
    }

    /// Find a direct child section by name, mutably
    fn find_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections_vec_mut().iter_mut().find(|s| s.name == name)
    }

    /// Index of a direct child section by name
    fn section_index(&self, name: &str) -> Option<usize> {
        self.sections().iter().position(|s| s.name == name)
    }

    /// Path from this container to the entity with the given id
    ///
    /// Searches the owned subtree only; overlay children are presentations,
    /// not owned entities, and are never part of a path.
    fn path_to(&self, id: Uuid) -> Option<TreePath> {
        for (index, section) in self.sections().iter().enumerate() {
            if let Some(path) = path_within(section, id, &[index]) {
                return Some(path);
            }
        }
        None
    }
}
