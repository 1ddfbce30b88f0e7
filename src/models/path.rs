//! Path addressing
//!
//! Entities are addressed two ways:
//! - index paths ([`TreePath`]): the sequence of indices from the document
//!   root, with `(0, idx)` pairs selecting sub-sections and `(1, idx)` pairs
//!   selecting properties inside a section;
//! - POSIX-like string paths: `"/secA/secB"` for sections and
//!   `"/secA/secB:propName"` for properties, resolvable with `.` and `..`
//!   segments relative to a base section.

use uuid::Uuid;

use super::container::SectionContainer;
use super::document::Document;
use super::error::PathError;
use super::property::Property;
use super::section::Section;

const KIND_SECTION: usize = 0;
const KIND_PROPERTY: usize = 1;

/// Index path from the document root
///
/// The empty path addresses the document itself. The first element indexes
/// the document's sections; every following pair is `(kind, index)` where
/// kind 0 selects a sub-section and kind 1 a property. A property pair is
/// always terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreePath(pub(crate) Vec<usize>);

impl TreePath {
    /// The document root
    pub fn root() -> Self {
        TreePath(Vec::new())
    }

    /// Build from raw indices; shape is validated
    pub fn from_indices(indices: Vec<usize>) -> Result<Self, PathError> {
        let valid = indices.is_empty()
            || (indices.len() % 2 == 1
                && indices[1..].chunks(2).enumerate().all(|(i, pair)| {
                    pair[0] == KIND_SECTION
                        || (pair[0] == KIND_PROPERTY
                            && i == indices.len() / 2 - 1)
                }));
        if !valid {
            return Err(PathError::InvalidIndexPath(format!("{:?}", indices)));
        }
        Ok(TreePath(indices))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this path addresses a property
    pub fn is_property(&self) -> bool {
        self.0.len() >= 3 && self.0[self.0.len() - 2] == KIND_PROPERTY
    }

    /// Path of the owning container; `None` above the document root
    pub fn parent(&self) -> Option<TreePath> {
        match self.0.len() {
            0 => None,
            1 => Some(TreePath::root()),
            n => Some(TreePath(self.0[..n - 2].to_vec())),
        }
    }

    /// Extend with a child section index
    pub fn child_section(&self, index: usize) -> TreePath {
        let mut indices = self.0.clone();
        if indices.is_empty() {
            indices.push(index);
        } else {
            indices.extend([KIND_SECTION, index]);
        }
        TreePath(indices)
    }

    /// Extend with a property index; only valid on a section path
    pub fn child_property(&self, index: usize) -> TreePath {
        debug_assert!(!self.0.is_empty() && !self.is_property());
        let mut indices = self.0.clone();
        indices.extend([KIND_PROPERTY, index]);
        TreePath(indices)
    }

    /// The final child index
    pub fn last_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    fn describe(&self) -> String {
        format!("{:?}", self.0)
    }
}

/// Locate an entity by id inside a section's owned subtree
pub(crate) fn path_within(section: &Section, id: Uuid, prefix: &[usize]) -> Option<TreePath> {
    if section.id() == id {
        return Some(TreePath(prefix.to_vec()));
    }
    for (index, property) in section.properties().iter().enumerate() {
        if property.id() == id {
            let mut indices = prefix.to_vec();
            indices.extend([KIND_PROPERTY, index]);
            return Some(TreePath(indices));
        }
    }
    for (index, child) in section.sections().iter().enumerate() {
        let mut indices = prefix.to_vec();
        indices.extend([KIND_SECTION, index]);
        if let Some(found) = path_within(child, id, &indices) {
            return Some(found);
        }
    }
    None
}

impl Document {
    /// Resolve an index path to a section
    pub fn section_at(&self, path: &TreePath) -> Result<&Section, PathError> {
        if path.is_root() {
            return Err(PathError::InvalidIndexPath(path.describe()));
        }
        if path.is_property() {
            return Err(PathError::NotASection(path.describe()));
        }
        let mut current = self
            .sections()
            .get(path.0[0])
            .ok_or_else(|| PathError::InvalidIndexPath(path.describe()))?;
        for pair in path.0[1..].chunks(2) {
            current = current
                .sections()
                .get(pair[1])
                .ok_or_else(|| PathError::InvalidIndexPath(path.describe()))?;
        }
        Ok(current)
    }

    /// Resolve an index path to a section, mutably
    pub fn section_at_mut(&mut self, path: &TreePath) -> Result<&mut Section, PathError> {
        if path.is_root() {
            return Err(PathError::InvalidIndexPath(path.describe()));
        }
        if path.is_property() {
            return Err(PathError::NotASection(path.describe()));
        }
        let describe = path.describe();
        let mut current = self
            .sections
            .get_mut(path.0[0])
            .ok_or_else(|| PathError::InvalidIndexPath(describe.clone()))?;
        for pair in path.0[1..].chunks(2) {
            current = current
                .sections
                .get_mut(pair[1])
                .ok_or_else(|| PathError::InvalidIndexPath(describe.clone()))?;
        }
        Ok(current)
    }

    /// Resolve an index path to a property
    pub fn property_at(&self, path: &TreePath) -> Result<&Property, PathError> {
        if !path.is_property() {
            return Err(PathError::NotAProperty(path.describe()));
        }
        let parent = self
            .section_at(&path.parent().expect("property path has a parent"))?;
        parent
            .properties()
            .get(path.0[path.0.len() - 1])
            .ok_or_else(|| PathError::InvalidIndexPath(path.describe()))
    }

    /// Resolve an index path to a property, mutably
    pub fn property_at_mut(&mut self, path: &TreePath) -> Result<&mut Property, PathError> {
        if !path.is_property() {
            return Err(PathError::NotAProperty(path.describe()));
        }
        let index = path.0[path.0.len() - 1];
        let describe = path.describe();
        let parent = self.section_at_mut(&path.parent().expect("property path has a parent"))?;
        parent
            .properties
            .get_mut(index)
            .ok_or(PathError::InvalidIndexPath(describe))
    }

    /// String form of a section path, `"/secA/secB"`
    pub fn section_path_str(&self, path: &TreePath) -> Result<String, PathError> {
        if path.is_root() {
            return Ok("/".to_string());
        }
        let mut names = Vec::new();
        let mut current = self
            .sections()
            .get(path.0[0])
            .ok_or_else(|| PathError::InvalidIndexPath(path.describe()))?;
        names.push(current.name.as_str());
        if path.is_property() {
            return Err(PathError::NotASection(path.describe()));
        }
        for pair in path.0[1..].chunks(2) {
            current = current
                .sections()
                .get(pair[1])
                .ok_or_else(|| PathError::InvalidIndexPath(path.describe()))?;
            names.push(current.name.as_str());
        }
        Ok(format!("/{}", names.join("/")))
    }

    /// String form of a property path, `"/secA/secB:propName"`
    pub fn property_path_str(&self, path: &TreePath) -> Result<String, PathError> {
        if !path.is_property() {
            return Err(PathError::NotAProperty(path.describe()));
        }
        let parent = path.parent().expect("property path has a parent");
        let section_str = self.section_path_str(&parent)?;
        let property = self.property_at(path)?;
        Ok(format!("{}:{}", section_str, property.name))
    }

    /// Resolve an absolute string path to a section
    pub fn resolve_section_str(&self, path: &str) -> Result<TreePath, PathError> {
        self.resolve_section_str_from(&TreePath::root(), path)
    }

    /// Resolve a string path to a section, relative to `base`
    ///
    /// Handles `.` and `..` segments; an absolute path ignores the base.
    pub fn resolve_section_str_from(
        &self,
        base: &TreePath,
        path: &str,
    ) -> Result<TreePath, PathError> {
        if path.contains(':') {
            return Err(PathError::NotASection(path.to_string()));
        }
        let mut current = if path.starts_with('/') {
            TreePath::root()
        } else {
            base.clone()
        };
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match segment {
                "." => {}
                ".." => {
                    current = current
                        .parent()
                        .ok_or_else(|| PathError::AboveRoot(path.to_string()))?;
                }
                name => {
                    let children = if current.is_root() {
                        self.sections()
                    } else {
                        self.section_at(&current)?.sections()
                    };
                    let index = children.iter().position(|s| s.name == name).ok_or_else(|| {
                        PathError::UnknownSegment {
                            segment: name.to_string(),
                            path: path.to_string(),
                        }
                    })?;
                    current = current.child_section(index);
                }
            }
        }
        if current.is_root() {
            return Err(PathError::NotASection(path.to_string()));
        }
        Ok(current)
    }

    /// Resolve an absolute string path to a property
    pub fn resolve_property_str(&self, path: &str) -> Result<TreePath, PathError> {
        self.resolve_property_str_from(&TreePath::root(), path)
    }

    /// Resolve a string path to a property, relative to `base`
    pub fn resolve_property_str_from(
        &self,
        base: &TreePath,
        path: &str,
    ) -> Result<TreePath, PathError> {
        let (section_part, property_name) = path
            .rsplit_once(':')
            .ok_or_else(|| PathError::NotAProperty(path.to_string()))?;
        let section_path = if section_part.is_empty() {
            base.clone()
        } else {
            self.resolve_section_str_from(base, section_part)?
        };
        if section_path.is_root() {
            return Err(PathError::NotAProperty(path.to_string()));
        }
        let section = self.section_at(&section_path)?;
        let index = section
            .properties()
            .iter()
            .position(|p| p.name == property_name)
            .ok_or_else(|| PathError::UnknownSegment {
                segment: property_name.to_string(),
                path: path.to_string(),
            })?;
        Ok(section_path.child_property(index))
    }

    /// All section paths, depth-first pre-order
    pub fn section_paths(&self) -> Vec<TreePath> {
        fn walk(section: &Section, path: TreePath, out: &mut Vec<TreePath>) {
            out.push(path.clone());
            for (index, child) in section.sections().iter().enumerate() {
                walk(child, path.child_section(index), out);
            }
        }
        let mut out = Vec::new();
        for (index, section) in self.sections().iter().enumerate() {
            walk(section, TreePath(vec![index]), &mut out);
        }
        out
    }
}

/// Shortest `../`-prefixed navigation between two absolute section paths
///
/// Falls back to the absolute `to` path when the only common ancestor is the
/// document root, and to `"."` when both paths are equal.
pub fn relative_path(from: &str, to: &str) -> String {
    let from_segments: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segments: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();
    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 && !from_segments.is_empty() && !to_segments.is_empty() {
        return format!("/{}", to_segments.join("/"));
    }
    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from_segments.len() {
        parts.push("..");
    }
    parts.extend(&to_segments[common..]);
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Property, Value};
    use crate::values::TypedPayload;

    fn sample_doc() -> Document {
        let mut doc = Document::new();
        let mut a = Section::new("a");
        let mut b = Section::new("b");
        b.append_property(Property::new("p", Value::new(TypedPayload::Int(1))))
            .unwrap();
        a.append_section(b).unwrap();
        a.append_section(Section::new("c")).unwrap();
        doc.append_section(a).unwrap();
        doc.append_section(Section::new("d")).unwrap();
        doc
    }

    #[test]
    fn test_index_paths() {
        let doc = sample_doc();
        let b_path = TreePath::from_indices(vec![0, 0, 0]).unwrap();
        assert_eq!(doc.section_at(&b_path).unwrap().name, "b");

        let p_path = TreePath::from_indices(vec![0, 0, 0, 1, 0]).unwrap();
        assert!(p_path.is_property());
        assert_eq!(doc.property_at(&p_path).unwrap().name, "p");

        // a property path handed to the section resolver fails
        assert!(matches!(
            doc.section_at(&p_path),
            Err(PathError::NotASection(_))
        ));
        // and the reverse
        assert!(matches!(
            doc.property_at(&b_path),
            Err(PathError::NotAProperty(_))
        ));
    }

    #[test]
    fn test_path_of_round_trip() {
        let doc = sample_doc();
        let b_path = doc.resolve_section_str("/a/b").unwrap();
        let b_id = doc.section_at(&b_path).unwrap().id();
        assert_eq!(doc.path_of(b_id).unwrap(), b_path);

        let p_path = doc.resolve_property_str("/a/b:p").unwrap();
        let p_id = doc.property_at(&p_path).unwrap().id();
        assert_eq!(doc.path_of(p_id).unwrap(), p_path);
    }

    #[test]
    fn test_string_paths() {
        let doc = sample_doc();
        let b_path = doc.resolve_section_str("/a/b").unwrap();
        assert_eq!(doc.section_path_str(&b_path).unwrap(), "/a/b");

        let p_path = doc.resolve_property_str("/a/b:p").unwrap();
        assert_eq!(doc.property_path_str(&p_path).unwrap(), "/a/b:p");

        assert!(matches!(
            doc.resolve_section_str("/a/zzz"),
            Err(PathError::UnknownSegment { .. })
        ));
        assert!(matches!(
            doc.resolve_property_str("/a/b:zzz"),
            Err(PathError::UnknownSegment { .. })
        ));
    }

    #[test]
    fn test_relative_resolution() {
        let doc = sample_doc();
        let b_path = doc.resolve_section_str("/a/b").unwrap();
        // sibling through the parent
        let c_path = doc.resolve_section_str_from(&b_path, "../c").unwrap();
        assert_eq!(doc.section_path_str(&c_path).unwrap(), "/a/c");
        // `.` is a no-op
        let still_c = doc.resolve_section_str_from(&b_path, ".././c").unwrap();
        assert_eq!(still_c, c_path);
        // escaping above the root fails
        assert!(matches!(
            doc.resolve_section_str_from(&b_path, "../../../x"),
            Err(PathError::AboveRoot(_))
        ));
        // absolute path ignores the base
        let d_path = doc.resolve_section_str_from(&b_path, "/d").unwrap();
        assert_eq!(doc.section_path_str(&d_path).unwrap(), "/d");
    }

    #[test]
    fn test_relative_path_strings() {
        assert_eq!(relative_path("/a/b", "/a/c"), "../c");
        assert_eq!(relative_path("/a/b", "/a/b/c"), "c");
        assert_eq!(relative_path("/a/b/c", "/a/d"), "../../d");
        assert_eq!(relative_path("/a", "/a"), ".");
        // only common ancestor is the root: absolute fallback
        assert_eq!(relative_path("/x/y", "/z/w"), "/z/w");
    }

    #[test]
    fn test_section_paths_pre_order() {
        let doc = sample_doc();
        let names: Vec<String> = doc
            .section_paths()
            .iter()
            .map(|p| doc.section_path_str(p).unwrap())
            .collect();
        assert_eq!(names, ["/a", "/a/b", "/a/c", "/d"]);
    }

    #[test]
    fn test_from_indices_validates_shape() {
        assert!(TreePath::from_indices(vec![]).is_ok());
        assert!(TreePath::from_indices(vec![0]).is_ok());
        assert!(TreePath::from_indices(vec![0, 0, 1]).is_ok());
        assert!(TreePath::from_indices(vec![0, 1, 0]).is_ok());
        // even length is never a valid entity path
        assert!(TreePath::from_indices(vec![0, 1]).is_err());
        // a property pair must be terminal
        assert!(TreePath::from_indices(vec![0, 1, 0, 0, 2]).is_err());
        // kind tag must be 0 or 1
        assert!(TreePath::from_indices(vec![0, 2, 0]).is_err());
    }
}
