//! Museum module catalog.
//!
//! ## Exhibition halls
//!
//! | Slug              | ModuleId       | Hall                 |
//! |-------------------|----------------|----------------------|
//! | `basic-knowledge` | BasicKnowledge | 细胞知识馆 (knowledge) |
//! | `guide-plans`     | GuidePlans     | 导学案展厅 (lessons)   |
//! | `drawings`        | Drawings       | 绘图作品馆 (drawings)  |
//! | `models`          | Models         | 细胞模型馆 (models)    |

mod keywords;

pub use keywords::{KeywordIndex, ModuleMatches, SearchQuery, SearchResults, MIN_QUERY_CHARS};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slugs for the four halls, in navigation order.
const MODULE_SLUGS: [&str; 4] = ["basic-knowledge", "guide-plans", "drawings", "models"];

/// Display names shown to visitors, in navigation order.
pub const MODULE_LABELS: [&str; 4] = [
    "细胞知识馆", // basic knowledge: organelles and cell structure
    "导学案展厅", // guide plans: lesson plans and exercises
    "绘图作品馆", // drawings: student cell drawings
    "细胞模型馆", // models: handmade and 3D cell models
];

/// Identifier of one embedded content module. The set is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleId {
    #[default]
    BasicKnowledge = 1,
    GuidePlans = 2,
    Drawings = 3,
    Models = 4,
}

impl ModuleId {
    #[inline]
    fn position(&self) -> usize {
        *self as usize - 1
    }

    /// The `data-module` attribute value and URL segment for this module.
    #[inline]
    pub fn slug(&self) -> &'static str {
        MODULE_SLUGS[self.position()]
    }

    /// Human-readable hall name.
    #[inline]
    pub fn display_name(&self) -> &'static str {
        MODULE_LABELS[self.position()]
    }

    /// Source URL of the embedded frame when this module is active.
    pub fn frame_url(&self) -> String {
        format!("modules/{}/index.html", self.slug())
    }

    /// Parses a `data-module` value. Returns None for anything outside the catalog.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::all().into_iter().find(|m| m.slug() == slug)
    }

    /// All modules in navigation order.
    pub fn all() -> [Self; 4] {
        [Self::BasicKnowledge, Self::GuidePlans, Self::Drawings, Self::Models]
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_url_is_derived_from_slug() {
        assert_eq!(ModuleId::BasicKnowledge.frame_url(), "modules/basic-knowledge/index.html");
        assert_eq!(ModuleId::GuidePlans.frame_url(), "modules/guide-plans/index.html");
        assert_eq!(ModuleId::Drawings.frame_url(), "modules/drawings/index.html");
        assert_eq!(ModuleId::Models.frame_url(), "modules/models/index.html");
    }

    #[test]
    fn slugs_round_trip_and_unknown_is_rejected() {
        for module in ModuleId::all() {
            assert_eq!(ModuleId::from_slug(module.slug()), Some(module));
        }
        assert_eq!(ModuleId::from_slug("gallery"), None);
        assert_eq!(ModuleId::from_slug(""), None);
    }

    #[test]
    fn serde_uses_kebab_case_slug() {
        let json = serde_json::to_string(&ModuleId::GuidePlans).unwrap();
        assert_eq!(json, "\"guide-plans\"");
        let back: ModuleId = serde_json::from_str("\"models\"").unwrap();
        assert_eq!(back, ModuleId::Models);
    }

    #[test]
    fn display_names_match_halls() {
        assert_eq!(ModuleId::BasicKnowledge.display_name(), "细胞知识馆");
        assert_eq!(ModuleId::Models.display_name(), "细胞模型馆");
        assert_eq!(ModuleId::default(), ModuleId::BasicKnowledge);
    }
}
