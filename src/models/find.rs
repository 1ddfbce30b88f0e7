//! Related-section search
//!
//! `find_related` looks outward from a section: first its children
//! (depth-first, optionally recursive), then its siblings, then its
//! ancestors up to the root. The first match wins unless all matches are
//! requested, in which case only the children phase is exhaustive.

use super::container::SectionContainer;
use super::document::Document;
use super::path::TreePath;
use super::section::Section;

/// What to match: a section name, a section type, or both
#[derive(Debug, Clone, Copy, Default)]
pub struct FindSpec<'a> {
    pub name: Option<&'a str>,
    pub section_type: Option<&'a str>,
}

impl<'a> FindSpec<'a> {
    pub fn by_name(name: &'a str) -> Self {
        Self {
            name: Some(name),
            section_type: None,
        }
    }

    pub fn by_type(section_type: &'a str) -> Self {
        Self {
            name: None,
            section_type: Some(section_type),
        }
    }

    fn matches(&self, section: &Section) -> bool {
        if self.name.is_none() && self.section_type.is_none() {
            return false;
        }
        if let Some(name) = self.name
            && section.name != name
        {
            return false;
        }
        if let Some(section_type) = self.section_type
            && section.section_type != section_type
        {
            return false;
        }
        true
    }
}

/// Which phases to run and how
#[derive(Debug, Clone, Copy)]
pub struct FindOptions {
    pub children: bool,
    pub siblings: bool,
    pub parents: bool,
    pub recursive: bool,
    pub all: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            children: true,
            siblings: true,
            parents: true,
            recursive: true,
            all: false,
        }
    }
}

impl Document {
    /// Search for sections related to the one at `origin`
    ///
    /// Returns paths in search order. Without `all`, at most one path is
    /// returned. With `all`, every children-phase match is collected; if the
    /// children phase finds nothing the later phases still return only the
    /// first match.
    pub fn find_related(
        &self,
        origin: &TreePath,
        spec: &FindSpec<'_>,
        options: FindOptions,
    ) -> Vec<TreePath> {
        let mut matches = Vec::new();

        if options.children {
            let origin_section = match self.section_at(origin) {
                Ok(section) => section,
                Err(_) => return matches,
            };
            collect_children(
                origin_section,
                origin,
                spec,
                options.recursive,
                options.all,
                &mut matches,
            );
            if !matches.is_empty() {
                return matches;
            }
        }

        if options.siblings
            && let Some(parent) = origin.parent()
        {
            let siblings: &[Section] = if parent.is_root() {
                self.sections()
            } else {
                match self.section_at(&parent) {
                    Ok(section) => section.sections(),
                    Err(_) => &[],
                }
            };
            for (index, sibling) in siblings.iter().enumerate() {
                let path = parent.child_section(index);
                if &path != origin && spec.matches(sibling) {
                    matches.push(path);
                    return matches;
                }
            }
        }

        if options.parents {
            let mut current = origin.parent();
            while let Some(path) = current {
                if path.is_root() {
                    break;
                }
                if let Ok(section) = self.section_at(&path)
                    && spec.matches(section)
                {
                    matches.push(path);
                    return matches;
                }
                current = path.parent();
            }
        }

        matches
    }
}

fn collect_children(
    section: &Section,
    path: &TreePath,
    spec: &FindSpec<'_>,
    recursive: bool,
    all: bool,
    out: &mut Vec<TreePath>,
) {
    for (index, child) in section.sections().iter().enumerate() {
        let child_path = path.child_section(index);
        if spec.matches(child) {
            out.push(child_path.clone());
            if !all {
                return;
            }
        }
        if recursive {
            collect_children(child, &child_path, spec, recursive, all, out);
            if !all && !out.is_empty() {
                return;
            }
        }
    }
}
