//! Section model

use uuid::Uuid;

use super::container::SectionContainer;
use super::error::{StructuralError, StructuralResult};
use super::property::Property;

/// Type string of a section whose type has not been set
pub const UNDEFINED_TYPE: &str = "undefined";

/// Children presented through a link/include target, one level deep
///
/// Overlay children are read-only presentations; they are not owned by the
/// presenting section and must be materialized before mutation.
#[derive(Debug, Clone, Default)]
pub(crate) struct Overlay {
    pub(crate) sections: Vec<Section>,
    pub(crate) properties: Vec<Property>,
}

/// A named section owning sub-sections and properties
///
/// `link` points at another section of the same document, `include` at a
/// section of a foreign document; the two are mutually exclusive. A section
/// with either installs a virtual overlay on `merge`, exposing the target's
/// non-colliding children as its own.
#[derive(Debug, Clone)]
pub struct Section {
    pub(crate) id: Uuid,
    pub name: String,
    pub section_type: String,
    pub definition: Option<String>,
    pub reference: Option<String>,
    pub repository: Option<String>,
    pub mapping: Option<String>,
    link: Option<String>,
    include: Option<String>,
    pub(crate) sections: Vec<Section>,
    pub(crate) properties: Vec<Property>,
    pub(crate) overlay: Option<Overlay>,
}

impl Section {
    /// Create a section with an unset type
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_type(name, UNDEFINED_TYPE)
    }

    /// Create a section with the given type
    pub fn with_type(name: impl Into<String>, section_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            section_type: section_type.into(),
            definition: None,
            reference: None,
            repository: None,
            mapping: None,
            link: None,
            include: None,
            sections: Vec::new(),
            properties: Vec::new(),
            overlay: None,
        }
    }

    /// Create a section with an explicitly supplied id
    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        let mut section = Self::new(name);
        section.id = id;
        section
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the type has never been set
    pub fn is_type_undefined(&self) -> bool {
        self.section_type.is_empty() || self.section_type == UNDEFINED_TYPE
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Set or clear the link path; rejected while an include is set
    pub fn set_link(&mut self, link: Option<String>) -> StructuralResult<()> {
        if link.is_some() && self.include.is_some() {
            return Err(StructuralError::LinkIncludeConflict {
                section: self.name.clone(),
            });
        }
        self.link = link;
        Ok(())
    }

    pub fn include(&self) -> Option<&str> {
        self.include.as_deref()
    }

    /// Set or clear the include url; rejected while a link is set
    pub fn set_include(&mut self, include: Option<String>) -> StructuralResult<()> {
        if include.is_some() && self.link.is_some() {
            return Err(StructuralError::LinkIncludeConflict {
                section: self.name.clone(),
            });
        }
        self.include = include;
        Ok(())
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Append an own property, enforcing sibling-name uniqueness
    pub fn append_property(&mut self, property: Property) -> StructuralResult<()> {
        if self.properties.iter().any(|p| p.name == property.name) {
            return Err(StructuralError::DuplicateName {
                kind: "property",
                name: property.name,
            });
        }
        self.properties.push(property);
        Ok(())
    }

    /// Remove an own property by index
    pub fn remove_property(&mut self, index: usize) -> StructuralResult<Property> {
        if index >= self.properties.len() {
            return Err(StructuralError::IndexOutOfRange {
                index,
                len: self.properties.len(),
            });
        }
        Ok(self.properties.remove(index))
    }

    /// Remove an own property by name
    pub fn remove_property_by_name(&mut self, name: &str) -> Option<Property> {
        let index = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(index))
    }

    pub(crate) fn property_index_by_id(&self, id: Uuid) -> Option<usize> {
        self.properties.iter().position(|p| p.id() == id)
    }

    pub(crate) fn property_by_id_mut(&mut self, id: Uuid) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.id() == id)
    }

    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn find_property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    /// Whether a link/include overlay is currently installed
    pub fn is_merged(&self) -> bool {
        self.overlay.is_some()
    }

    /// Own sections plus non-colliding overlay sections
    pub fn merged_sections(&self) -> Vec<&Section> {
        let mut all: Vec<&Section> = self.sections.iter().collect();
        if let Some(overlay) = &self.overlay {
            all.extend(overlay.sections.iter());
        }
        all
    }

    /// Own properties plus non-colliding overlay properties
    pub fn merged_properties(&self) -> Vec<&Property> {
        let mut all: Vec<&Property> = self.properties.iter().collect();
        if let Some(overlay) = &self.overlay {
            all.extend(overlay.properties.iter());
        }
        all
    }

    /// Discard overlays in this section and its whole subtree
    pub fn clean(&mut self) {
        self.overlay = None;
        for child in &mut self.sections {
            child.clean();
        }
    }

    /// Install a one-level overlay presenting `target`'s children
    ///
    /// Only children whose names do not collide with own children are
    /// exposed. Overlay clones keep the source ids; the presentation is
    /// content-equal to the target's children.
    pub(crate) fn merge_from(&mut self, target: &Section) {
        let mut overlay = Overlay::default();
        for child in &target.sections {
            if !self.sections.iter().any(|own| own.name == child.name) {
                overlay.sections.push(child.clone());
            }
        }
        for child in &target.properties {
            if !self.properties.iter().any(|own| own.name == child.name) {
                overlay.properties.push(child.clone());
            }
        }
        self.overlay = Some(overlay);
    }

    /// Materialize an overlay section into a real child (copy-on-write)
    ///
    /// Returns the index of the now-real child. A child that is already own
    /// is returned as-is. The materialized clone gets fresh ids so the link
    /// target's entities stay unique in the document.
    pub(crate) fn materialize_section(&mut self, name: &str) -> StructuralResult<usize> {
        if let Some(index) = self.sections.iter().position(|s| s.name == name) {
            return Ok(index);
        }
        let overlay = self
            .overlay
            .as_mut()
            .ok_or_else(|| StructuralError::UnknownChild {
                name: name.to_string(),
            })?;
        let index = overlay
            .sections
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| StructuralError::UnknownChild {
                name: name.to_string(),
            })?;
        let mut materialized = overlay.sections.remove(index);
        materialized.refresh_ids();
        self.sections.push(materialized);
        Ok(self.sections.len() - 1)
    }

    /// Materialize an overlay property into a real child (copy-on-write)
    pub(crate) fn materialize_property(&mut self, name: &str) -> StructuralResult<usize> {
        if let Some(index) = self.properties.iter().position(|p| p.name == name) {
            return Ok(index);
        }
        let overlay = self
            .overlay
            .as_mut()
            .ok_or_else(|| StructuralError::UnknownChild {
                name: name.to_string(),
            })?;
        let index = overlay
            .properties
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| StructuralError::UnknownChild {
                name: name.to_string(),
            })?;
        let mut materialized = overlay.properties.remove(index);
        materialized.id = Uuid::new_v4();
        self.properties.push(materialized);
        Ok(self.properties.len() - 1)
    }

    /// Deep-clone the subtree; fresh ids are assigned unless `keep_id`
    pub fn clone_tree(&self, keep_id: bool) -> Section {
        let mut cloned = self.clone();
        cloned.overlay = None;
        if !keep_id {
            cloned.refresh_ids();
        }
        cloned
    }

    /// Clone attributes only, no children, fresh id
    pub fn clone_empty(&self) -> Section {
        let mut cloned = self.clone();
        cloned.id = Uuid::new_v4();
        cloned.sections = Vec::new();
        cloned.properties = Vec::new();
        cloned.overlay = None;
        cloned
    }

    /// Clone attributes and direct children, but no grandchildren
    pub fn clone_direct(&self) -> Section {
        let mut cloned = self.clone_empty();
        cloned.sections = self.sections.iter().map(|s| s.clone_empty()).collect();
        cloned.properties = self
            .properties
            .iter()
            .map(|p| p.clone_entity(false))
            .collect();
        cloned
    }

    /// Assign new ids to this section and everything below it
    pub(crate) fn refresh_ids(&mut self) {
        self.id = Uuid::new_v4();
        for property in &mut self.properties {
            property.id = Uuid::new_v4();
        }
        for child in &mut self.sections {
            child.refresh_ids();
        }
    }
}

impl SectionContainer for Section {
    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn sections_vec_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    fn container_name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.section_type == other.section_type
            && self.definition == other.definition
            && self.reference == other.reference
            && self.repository == other.repository
            && self.mapping == other.mapping
            && self.link == other.link
            && self.include == other.include
            && self.sections == other.sections
            && self.properties == other.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;
    use crate::values::TypedPayload;

    #[test]
    fn test_duplicate_sibling_names_rejected() {
        let mut section = Section::new("parent");
        section.append_section(Section::new("child")).unwrap();
        assert!(section.append_section(Section::new("child")).is_err());

        // properties are a separate kind: same name as a section is fine
        let p = Property::new("child", Value::new(TypedPayload::Int(1)));
        section.append_property(p).unwrap();
        let p2 = Property::new("child", Value::new(TypedPayload::Int(2)));
        assert!(section.append_property(p2).is_err());
    }

    #[test]
    fn test_link_include_exclusive() {
        let mut section = Section::new("s");
        section.set_link(Some("/other".to_string())).unwrap();
        assert!(
            section
                .set_include(Some("http://x.org#/a".to_string()))
                .is_err()
        );
        section.set_link(None).unwrap();
        assert!(
            section
                .set_include(Some("http://x.org#/a".to_string()))
                .is_ok()
        );
    }

    #[test]
    fn test_clone_tree_refreshes_ids() {
        let mut section = Section::new("s");
        let mut child = Section::new("c");
        child
            .append_property(Property::new("p", Value::new(TypedPayload::Int(1))))
            .unwrap();
        section.append_section(child).unwrap();

        let cloned = section.clone_tree(false);
        assert_eq!(cloned, section);
        assert_ne!(cloned.id(), section.id());
        assert_ne!(cloned.sections()[0].id(), section.sections()[0].id());
        assert_ne!(
            cloned.sections()[0].properties()[0].id(),
            section.sections()[0].properties()[0].id()
        );

        let unsafe_clone = section.clone_tree(true);
        assert_eq!(unsafe_clone.id(), section.id());
    }

    #[test]
    fn test_clone_depths() {
        let mut grandchild = Section::new("gc");
        grandchild
            .append_property(Property::new("gp", Value::new(TypedPayload::Int(1))))
            .unwrap();
        let mut child = Section::with_type("c", "T");
        child.append_section(grandchild).unwrap();
        let mut section = Section::with_type("s", "S");
        section.append_section(child).unwrap();
        section
            .append_property(Property::new("p", Value::new(TypedPayload::Int(2))))
            .unwrap();

        let empty = section.clone_empty();
        assert!(empty.sections().is_empty());
        assert!(empty.properties().is_empty());
        assert_eq!(empty.section_type, "S");

        let direct = section.clone_direct();
        assert_eq!(direct.sections().len(), 1);
        assert_eq!(direct.properties().len(), 1);
        // grandchildren are stripped
        assert!(direct.sections()[0].sections().is_empty());
    }
}
