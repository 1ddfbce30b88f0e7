//! Two-pass terminology mapping
//!
//! Pass 1 retypes sections against their terminology targets; pass 2 renames
//! and relocates properties. Both passes walk the tree depth-first
//! pre-order. Moves go through the document by path, so every structural
//! invariant (sibling-name uniqueness, non-empty value lists) stays enforced
//! by the entity model itself.

use tracing::{debug, info};
use uuid::Uuid;

use super::error::{MappingError, MappingResult};
use crate::models::{
    Document, Property, Section, SectionContainer, StructuralError, TreePath, relative_path,
};
use crate::terminology::{TerminologyCache, TerminologyLoader};

/// A parsed `url#type[:name]` mapping attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTarget {
    pub url: String,
    pub type_name: String,
    pub property_name: Option<String>,
}

impl MappingTarget {
    pub fn parse(raw: &str) -> MappingResult<Self> {
        let invalid = || MappingError::InvalidTarget(raw.to_string());
        let (url, fragment) = raw.split_once('#').ok_or_else(invalid)?;
        if url.is_empty() || fragment.is_empty() {
            return Err(invalid());
        }
        let (type_name, property_name) = match fragment.split_once(':') {
            Some((type_name, name)) if !type_name.is_empty() && !name.is_empty() => {
                (type_name.to_string(), Some(name.to_string()))
            }
            Some(_) => return Err(invalid()),
            None => (fragment.to_string(), None),
        };
        Ok(Self {
            url: url.to_string(),
            type_name,
            property_name,
        })
    }
}

/// Outcome of mapping one document
///
/// Per-property failures are collected here, not silently dropped; a failed
/// property never stops unrelated branches from mapping.
#[derive(Debug, Default)]
pub struct MappingReport {
    pub sections_retyped: usize,
    pub properties_renamed: usize,
    pub properties_moved: usize,
    pub skipped: Vec<String>,
    pub errors: Vec<MappingError>,
}

impl MappingReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Rewrites a document's structure against external terminologies
pub struct MappingEngine<'a> {
    loader: &'a dyn TerminologyLoader,
    cache: &'a mut TerminologyCache,
}

impl<'a> MappingEngine<'a> {
    pub fn new(loader: &'a dyn TerminologyLoader, cache: &'a mut TerminologyCache) -> Self {
        Self { loader, cache }
    }

    /// Map every section and property carrying a mapping attribute
    ///
    /// Idempotent once the attributes are cleared: a second run is a no-op.
    pub fn map_document(&mut self, doc: &mut Document) -> MappingReport {
        let mut report = MappingReport::default();
        self.map_sections(doc, &mut report);
        self.map_properties(doc, &mut report);
        report
    }

    /// Pass 1: adopt terminology types and repositories on sections
    fn map_sections(&mut self, doc: &mut Document, report: &mut MappingReport) {
        for path in doc.section_paths() {
            let Some(attr) = doc
                .section_at(&path)
                .ok()
                .and_then(|s| s.mapping.clone())
                .filter(|attr| !attr.is_empty())
            else {
                continue;
            };
            let target = match MappingTarget::parse(&attr) {
                Ok(target) => target,
                Err(err) => {
                    report.errors.push(err);
                    continue;
                }
            };
            let Some(terminology) = self.cache.get_or_load(self.loader, &target.url) else {
                info!(url = %target.url, "terminology not loadable; section left unmapped");
                report
                    .skipped
                    .push(format!("terminology {} not loadable", target.url));
                continue;
            };
            let Some(term_section) = find_terminology_section(terminology, &target) else {
                let path_str = doc.section_path_str(&path).unwrap_or_default();
                report.errors.push(MappingError::UnresolvedTarget {
                    path: path_str,
                    target: attr,
                });
                continue;
            };
            let new_type = term_section.section_type.clone();
            let new_repository = term_section.repository.clone();

            // the path cannot dangle here: pass 1 never restructures
            if let Ok(section) = doc.section_at_mut(&path) {
                section.section_type = new_type;
                section.mapping = None;
                if section.repository != new_repository {
                    section.repository = new_repository;
                }
                report.sections_retyped += 1;
            }
        }
    }

    /// Pass 2: rename and relocate properties
    fn map_properties(&mut self, doc: &mut Document, report: &mut MappingReport) {
        // collect ids up front; moves change paths but never ids
        let mut property_ids: Vec<Uuid> = Vec::new();
        for path in doc.section_paths() {
            if let Ok(section) = doc.section_at(&path) {
                property_ids.extend(section.properties().iter().map(|p| p.id()));
            }
        }
        for property_id in property_ids {
            if let Err(err) = self.map_property(doc, property_id, report) {
                report.errors.push(err);
            }
        }
    }

    fn map_property(
        &mut self,
        doc: &mut Document,
        property_id: Uuid,
        report: &mut MappingReport,
    ) -> MappingResult<()> {
        let Some(prop_path) = doc.path_of(property_id) else {
            return Ok(());
        };
        let Some(attr) = doc
            .property_at(&prop_path)?
            .mapping
            .clone()
            .filter(|attr| !attr.is_empty())
        else {
            return Ok(());
        };
        let prop_path_str = doc.property_path_str(&prop_path)?;
        let target = MappingTarget::parse(&attr)?;
        let Some(target_prop_name) = target.property_name.clone() else {
            return Err(MappingError::InvalidTarget(attr));
        };
        let Some(terminology) = self.cache.get_or_load(self.loader, &target.url) else {
            info!(url = %target.url, property = %prop_path_str, "terminology not loadable; property left unmapped");
            report
                .skipped
                .push(format!("terminology {} not loadable", target.url));
            return Ok(());
        };
        let Some((term_section, term_prop)) =
            find_terminology_property(terminology, &target.type_name, &target_prop_name)
        else {
            return Err(MappingError::UnresolvedTarget {
                path: prop_path_str,
                target: attr,
            });
        };
        let dest_type = term_section.section_type.clone();
        let new_name = term_prop.name.clone();
        let template_empty = term_section.clone_empty();
        let template_direct = term_section.clone_direct();

        let sec_path = prop_path.parent().expect("property path has a parent");
        let own_type = doc.section_at(&sec_path)?.section_type.clone();

        // (a) co-located: the owning section already has the target's type
        if own_type == dest_type {
            rename_property(doc, &sec_path, property_id, &new_name)?;
            report.properties_renamed += 1;
            debug!(property = %prop_path_str, name = %new_name, "renamed in place");
            return Ok(());
        }

        // (b) a direct sub-section of the target's type
        let child_candidates: Vec<usize> = doc
            .section_at(&sec_path)?
            .sections()
            .iter()
            .enumerate()
            .filter(|(_, child)| child.section_type == dest_type)
            .map(|(index, _)| index)
            .collect();
        match child_candidates.len() {
            1 => {
                let dest = sec_path.child_section(child_candidates[0]);
                move_property(doc, &sec_path, property_id, &dest, &new_name)?;
                report.properties_moved += 1;
                debug!(property = %prop_path_str, "moved into sub-section");
                return Ok(());
            }
            candidates if candidates > 1 => {
                return Err(MappingError::AmbiguousTarget {
                    path: prop_path_str,
                    dest_type,
                    candidates,
                });
            }
            _ => {}
        }

        // (c) a sibling section of the target's type
        let parent_path = sec_path.parent().expect("section path has a parent");
        let own_index = sec_path.last_index().expect("section path is non-empty");
        let all_children: Vec<String> = if parent_path.is_root() {
            doc.sections().iter().map(|s| s.section_type.clone()).collect()
        } else {
            doc.section_at(&parent_path)?
                .sections()
                .iter()
                .map(|s| s.section_type.clone())
                .collect()
        };
        let sibling_candidates: Vec<usize> = all_children
            .iter()
            .enumerate()
            .filter(|(index, section_type)| *index != own_index && **section_type == dest_type)
            .map(|(index, _)| index)
            .collect();
        match sibling_candidates.len() {
            1 => {
                let sibling_index = sibling_candidates[0];
                let sibling_path = parent_path.child_section(sibling_index);
                // reverse relation: sections of the property's own type among
                // the sibling's siblings (the section itself included)
                let reverse_relations = all_children
                    .iter()
                    .enumerate()
                    .filter(|(index, section_type)| {
                        *index != sibling_index && **section_type == own_type
                    })
                    .count();
                if reverse_relations == 1 {
                    move_property(doc, &sec_path, property_id, &sibling_path, &new_name)?;
                    report.properties_moved += 1;
                    debug!(property = %prop_path_str, "moved into sibling");
                } else {
                    // the sibling serves several sections of this type;
                    // synthesize a link-child instead of stealing it
                    let mut link_child = template_direct;
                    link_child.remove_property_by_name(&new_name);
                    let sec_str = doc.section_path_str(&sec_path)?;
                    let sibling_str = doc.section_path_str(&sibling_path)?;
                    let child_str = format!("{}/{}", sec_str, link_child.name);
                    link_child
                        .set_link(Some(relative_path(&child_str, &sibling_str)))
                        .map_err(MappingError::from)?;
                    let dest = append_synthesized(doc, &sec_path, link_child)?;
                    move_property(doc, &sec_path, property_id, &dest, &new_name)?;
                    report.properties_moved += 1;
                    debug!(property = %prop_path_str, "moved into synthesized link-child");
                }
                return Ok(());
            }
            candidates if candidates > 1 => {
                return Err(MappingError::AmbiguousTarget {
                    path: prop_path_str,
                    dest_type,
                    candidates,
                });
            }
            _ => {}
        }

        // (d) fallback: synthesize an empty child of the target's type
        let dest = append_synthesized(doc, &sec_path, template_empty)?;
        move_property(doc, &sec_path, property_id, &dest, &new_name)?;
        report.properties_moved += 1;
        debug!(property = %prop_path_str, "moved into synthesized child");
        Ok(())
    }
}

/// First terminology section matching the target, pre-order
fn find_terminology_section<'d>(
    doc: &'d Document,
    target: &MappingTarget,
) -> Option<&'d Section> {
    fn walk<'d>(
        sections: &'d [Section],
        type_name: &str,
        name: Option<&str>,
    ) -> Option<&'d Section> {
        for section in sections {
            if section.section_type == type_name && name.is_none_or(|n| section.name == n) {
                return Some(section);
            }
            if let Some(found) = walk(section.sections(), type_name, name) {
                return Some(found);
            }
        }
        None
    }
    walk(
        doc.sections(),
        &target.type_name,
        target.property_name.as_deref(),
    )
}

/// First terminology section of the given type holding the named property
fn find_terminology_property<'d>(
    doc: &'d Document,
    type_name: &str,
    property_name: &str,
) -> Option<(&'d Section, &'d Property)> {
    fn walk<'d>(
        sections: &'d [Section],
        type_name: &str,
        property_name: &str,
    ) -> Option<(&'d Section, &'d Property)> {
        for section in sections {
            if section.section_type == type_name
                && let Some(property) = section.find_property(property_name)
            {
                return Some((section, property));
            }
            if let Some(found) = walk(section.sections(), type_name, property_name) {
                return Some(found);
            }
        }
        None
    }
    walk(doc.sections(), type_name, property_name)
}

/// Rename a property in place, clearing its mapping attribute
fn rename_property(
    doc: &mut Document,
    sec_path: &TreePath,
    property_id: Uuid,
    new_name: &str,
) -> MappingResult<()> {
    let section = doc.section_at_mut(sec_path)?;
    if section
        .properties()
        .iter()
        .any(|p| p.id() != property_id && p.name == new_name)
    {
        return Err(MappingError::Structural(StructuralError::DuplicateName {
            kind: "property",
            name: new_name.to_string(),
        }));
    }
    let property = section
        .property_by_id_mut(property_id)
        .ok_or(StructuralError::UnknownChild {
            name: new_name.to_string(),
        })?;
    property.name = new_name.to_string();
    property.mapping = None;
    Ok(())
}

/// Move a property between sections, renaming it; values travel unchanged
///
/// The destination is checked for a name collision before the property
/// leaves its source, so a refused move leaves the tree exactly as it was.
fn move_property(
    doc: &mut Document,
    from: &TreePath,
    property_id: Uuid,
    to: &TreePath,
    new_name: &str,
) -> MappingResult<()> {
    if doc
        .section_at(to)?
        .properties()
        .iter()
        .any(|p| p.name == new_name)
    {
        return Err(MappingError::Structural(StructuralError::DuplicateName {
            kind: "property",
            name: new_name.to_string(),
        }));
    }
    let source = doc.section_at_mut(from)?;
    let index = source
        .property_index_by_id(property_id)
        .ok_or(StructuralError::UnknownChild {
            name: new_name.to_string(),
        })?;
    let mut property = source.remove_property(index)?;
    property.name = new_name.to_string();
    property.mapping = None;
    doc.section_at_mut(to)?.append_property(property)?;
    Ok(())
}

/// Append a synthesized section and return its path
fn append_synthesized(
    doc: &mut Document,
    parent: &TreePath,
    section: Section,
) -> MappingResult<TreePath> {
    let owner = doc.section_at_mut(parent)?;
    owner.append_section(section)?;
    Ok(parent.child_section(owner.sections().len() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parsing() {
        let target = MappingTarget::parse("http://t.org/terms.xml#hardware:Model").unwrap();
        assert_eq!(target.url, "http://t.org/terms.xml");
        assert_eq!(target.type_name, "hardware");
        assert_eq!(target.property_name.as_deref(), Some("Model"));

        let target = MappingTarget::parse("http://t.org/terms.xml#hardware").unwrap();
        assert_eq!(target.property_name, None);

        assert!(MappingTarget::parse("no-fragment").is_err());
        assert!(MappingTarget::parse("#hardware").is_err());
        assert!(MappingTarget::parse("http://t.org#").is_err());
        assert!(MappingTarget::parse("http://t.org#:Model").is_err());
    }
}
