//! Document model

use chrono::NaiveDate;
use uuid::Uuid;

use super::container::SectionContainer;
use super::section::Section;

/// Root of an odML tree
///
/// Owns the top-level sections; every entity below is reachable through a
/// [`TreePath`](super::TreePath) or its id.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) id: Uuid,
    pub author: Option<String>,
    pub date: Option<NaiveDate>,
    pub version: Option<String>,
    pub repository: Option<String>,
    pub(crate) sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            author: None,
            date: None,
            version: None,
            repository: None,
            sections: Vec::new(),
        }
    }

    /// Create a document with an explicitly supplied id
    pub fn with_id(id: Uuid) -> Self {
        let mut doc = Self::new();
        doc.id = id;
        doc
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Path of the entity with the given id, if it is in this document
    pub fn path_of(&self, id: Uuid) -> Option<super::TreePath> {
        self.path_to(id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionContainer for Document {
    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn sections_vec_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    fn container_name(&self) -> &str {
        "document"
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.author == other.author
            && self.date == other.date
            && self.version == other.version
            && self.repository == other.repository
            && self.sections == other.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_assigned_at_construction() {
        let a = Document::new();
        let b = Document::new();
        assert_ne!(a.id(), b.id());

        let id = Uuid::new_v4();
        assert_eq!(Document::with_id(id).id(), id);
    }

    #[test]
    fn test_content_equality_ignores_id() {
        let mut a = Document::new();
        let mut b = Document::new();
        a.author = Some("ada".to_string());
        b.author = Some("ada".to_string());
        assert_eq!(a, b);
        b.version = Some("2".to_string());
        assert_ne!(a, b);
    }
}
