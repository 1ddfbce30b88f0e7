//! Link/include resolution and merge overlays
//!
//! A section declaring `link` (a path to another section of the same
//! document) or `include` (a foreign document url plus fragment) can present
//! the target's children as its own, one level deep. Resolution is deferred
//! until the whole document is available, so forward references to sections
//! parsed later are legal.

use tracing::{info, warn};

use crate::models::{Document, SectionContainer, StructuralError, StructuralResult, TreePath};
use crate::terminology::TerminologyLoader;

impl Document {
    /// Resolve links and includes for every section, depth-first pre-order
    ///
    /// Sections whose target cannot be resolved are skipped; the failures
    /// are returned rather than aborting the rest of the document.
    pub fn merge_all(&mut self, loader: Option<&dyn TerminologyLoader>) -> Vec<StructuralError> {
        let mut failures = Vec::new();
        for path in self.section_paths() {
            if let Err(err) = self.merge_section(&path, loader) {
                warn!(error = %err, "skipping unresolvable link target");
                failures.push(err);
            }
        }
        failures
    }

    /// Resolve this section's link or include and install the overlay
    ///
    /// The overlay exposes the target's direct children whose names do not
    /// collide with own children; own children stay authoritative. A failed
    /// include load is skipped with an info trace, per the terminology
    /// loader contract.
    pub fn merge_section(
        &mut self,
        path: &TreePath,
        loader: Option<&dyn TerminologyLoader>,
    ) -> StructuralResult<()> {
        let section = self.section_at(path)?;
        if let Some(link) = section.link() {
            let link = link.to_string();
            let target_path = self.resolve_section_str_from(path, &link)?;
            if &target_path == path {
                warn!(%link, "section links to itself; not merged");
                return Ok(());
            }
            let target = self.section_at(&target_path)?.clone();
            self.section_at_mut(path)?.merge_from(&target);
        } else if let Some(include) = section.include() {
            let include = include.to_string();
            let (url, fragment) = include.split_once('#').unwrap_or((include.as_str(), ""));
            let Some(foreign) = loader.and_then(|l| l.load(url)) else {
                info!(url, "include target not loadable; section left unmerged");
                return Ok(());
            };
            let fragment = if fragment.starts_with('/') {
                fragment.to_string()
            } else {
                format!("/{}", fragment)
            };
            let target_path = foreign.resolve_section_str(&fragment)?;
            let target = foreign.section_at(&target_path)?.clone();
            self.section_at_mut(path)?.merge_from(&target);
        }
        Ok(())
    }

    /// Discard every overlay in the document
    pub fn clean_all(&mut self) {
        for section in self.sections_vec_mut() {
            section.clean();
        }
    }

    /// Copy-on-write: turn an overlay sub-section into a real child
    ///
    /// Appending through an overlay child must never mutate the link target;
    /// this clones the overlay child (fresh ids) into the section's own
    /// child list and returns its path. A child that is already own is
    /// returned as-is.
    pub fn materialize_section(
        &mut self,
        path: &TreePath,
        name: &str,
    ) -> StructuralResult<TreePath> {
        let section = self.section_at_mut(path)?;
        let index = section.materialize_section(name)?;
        Ok(path.child_section(index))
    }

    /// Copy-on-write for an overlay property
    pub fn materialize_property(
        &mut self,
        path: &TreePath,
        name: &str,
    ) -> StructuralResult<TreePath> {
        let section = self.section_at_mut(path)?;
        let index = section.materialize_property(name)?;
        Ok(path.child_property(index))
    }
}
