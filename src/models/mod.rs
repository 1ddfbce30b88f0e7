//! Entity model
//!
//! The odML tree: [`Document`] owns [`Section`]s, sections own sub-sections
//! and [`Property`]s, properties own [`Value`]s. Entities are addressed by
//! index paths ([`TreePath`]) or POSIX-like string paths; the non-owning
//! parent handle is the path, so the tree stays free of reference cycles.

pub mod container;
pub mod document;
pub mod error;
pub mod find;
pub mod path;
pub mod property;
pub mod section;
pub mod value;

pub use container::SectionContainer;
pub use document::Document;
pub use error::{PathError, StructuralError, StructuralResult};
pub use find::{FindOptions, FindSpec};
pub use path::{TreePath, relative_path};
pub use property::{Cardinality, Property};
pub use section::{Section, UNDEFINED_TYPE};
pub use value::Value;
