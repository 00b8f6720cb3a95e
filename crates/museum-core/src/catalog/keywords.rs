//! Static keyword index and the search rules applied to it.

use super::ModuleId;

/// Minimum trimmed query length (in characters) before a search runs.
pub const MIN_QUERY_CHARS: usize = 2;

const BASIC_KNOWLEDGE_TERMS: &[&str] = &[
    "细胞膜", "细胞质", "细胞核", "线粒体", "叶绿体", "内质网", "高尔基体", "核糖体", "溶酶体",
    "中心体", "液泡", "细胞壁",
];

const GUIDE_PLAN_TERMS: &[&str] = &[
    "导学案", "学习计划", "教学目标", "教学重点", "教学难点", "课堂活动", "课后练习",
];

const DRAWING_TERMS: &[&str] = &[
    "细胞结构图", "细胞器绘图", "显微镜绘图", "生物绘图", "科学绘图", "手绘细胞", "细胞分裂图",
];

const MODEL_TERMS: &[&str] = &[
    "细胞模型", "3D模型", "纸质模型", "塑料模型", "立体模型", "手工模型", "细胞结构模型",
];

/// Classified search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Nothing but whitespace.
    Empty,
    /// Fewer than [`MIN_QUERY_CHARS`] characters after trimming.
    TooShort,
    /// Trimmed, lowercased query ready for matching.
    Ready(String),
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Self::TooShort;
        }
        Self::Ready(trimmed.to_lowercase())
    }
}

/// Terms of one module that matched a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatches {
    pub module: ModuleId,
    pub matches: Vec<&'static str>,
}

/// Matches grouped by module, in navigation order. Modules without a match are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    groups: Vec<ModuleMatches>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn for_module(&self, module: ModuleId) -> Option<&ModuleMatches> {
        self.groups.iter().find(|g| g.module == module)
    }

    /// First module (navigation order) with at least one match.
    pub fn first(&self) -> Option<&ModuleMatches> {
        self.groups.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleMatches> {
        self.groups.iter()
    }

    /// Total matching terms across all modules.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }
}

/// Fixed mapping from module to its ordered search terms.
#[derive(Debug, Clone)]
pub struct KeywordIndex {
    entries: Vec<(ModuleId, &'static [&'static str])>,
}

impl KeywordIndex {
    /// The museum's built-in index.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                (ModuleId::BasicKnowledge, BASIC_KNOWLEDGE_TERMS),
                (ModuleId::GuidePlans, GUIDE_PLAN_TERMS),
                (ModuleId::Drawings, DRAWING_TERMS),
                (ModuleId::Models, MODEL_TERMS),
            ],
        }
    }

    pub fn terms(&self, module: ModuleId) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(m, _)| *m == module)
            .map(|(_, terms)| *terms)
            .unwrap_or(&[])
    }

    /// Case-insensitive substring match of `query` against every term.
    pub fn search(&self, query: &str) -> SearchResults {
        let needle = query.to_lowercase();
        let groups = self
            .entries
            .iter()
            .filter_map(|(module, terms)| {
                let matches: Vec<&'static str> = terms
                    .iter()
                    .copied()
                    .filter(|term| term.to_lowercase().contains(&needle))
                    .collect();
                (!matches.is_empty()).then(|| ModuleMatches { module: *module, matches })
            })
            .collect();
        SearchResults { groups }
    }
}

impl Default for KeywordIndex {
    fn default() -> Self {
        Self::builtin()
    }
}
