//! museum-core: shared types for the cell museum (module catalog, keyword search rules,
//! responsive layout policy, embedded content documents, configuration).
//!
//! The shell page, the module pages and the static host all build on this crate so the
//! catalog and the breakpoint live in exactly one place.

mod catalog;
mod document;
mod error;
mod layout;
mod shared;

pub use catalog::{
    KeywordIndex, ModuleId, ModuleMatches, SearchQuery, SearchResults, MIN_QUERY_CHARS,
    MODULE_LABELS,
};
pub use document::{ContentDocument, Element, Node, HIGHLIGHT_CLASS};
pub use error::{FrameAccessError, MuseumError};
pub use layout::{LayoutMode, MOBILE_BREAKPOINT_PX};
pub use shared::{MuseumConfig, DEFAULT_CONTENT_ROOT, DEFAULT_PORT};
