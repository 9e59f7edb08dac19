//! Level hierarchy definition
//!
//! Ordered list of levels, each depending on exactly its immediate
//! predecessor. Built once at startup and immutable afterwards; every shape
//! error is reported at construction as `Error::Config`.

use inv_common::config::{LevelConfig, LevelKindConfig};
use inv_common::{Error, Result};
use std::collections::HashMap;

/// How a level's options are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelKind {
    /// Options come from the suggestion provider
    Suggested,
    /// Terminal level; a single generated identifier is offered
    Identifier,
}

/// One stage of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub key: String,
    pub label: String,
    pub placeholder: String,
    pub depends_on: Option<String>,
    pub kind: LevelKind,
    /// Identifier levels: level whose value seeds generation
    pub seed_from: Option<String>,
}

impl Level {
    pub fn new(key: &str, label: &str, placeholder: &str, depends_on: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            depends_on: depends_on.map(str::to_string),
            kind: LevelKind::Suggested,
            seed_from: None,
        }
    }

    /// Mark as the identifier level, seeded from `seed_from` when given
    pub fn identifier(mut self, seed_from: Option<&str>) -> Self {
        self.kind = LevelKind::Identifier;
        self.seed_from = seed_from.map(str::to_string);
        self
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == LevelKind::Identifier
    }
}

impl From<&LevelConfig> for Level {
    fn from(config: &LevelConfig) -> Self {
        Self {
            key: config.key.clone(),
            label: config.label.clone(),
            placeholder: config.placeholder.clone(),
            depends_on: config.depends_on.clone(),
            kind: match config.kind {
                LevelKindConfig::Suggested => LevelKind::Suggested,
                LevelKindConfig::Identifier => LevelKind::Identifier,
            },
            seed_from: config.seed_from.clone(),
        }
    }
}

/// Validated, ordered level chain
#[derive(Debug, Clone)]
pub struct LevelHierarchy {
    levels: Vec<Level>,
    index: HashMap<String, usize>,
}

impl LevelHierarchy {
    /// Build a hierarchy, rejecting anything that is not a simple chain
    ///
    /// Level 0 must have no dependency; level i > 0 must depend on level i-1.
    /// At most one identifier level, and only in last position.
    pub fn new(levels: Vec<Level>) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::Config("Hierarchy has no levels".to_string()));
        }

        let mut index = HashMap::with_capacity(levels.len());
        for (position, level) in levels.iter().enumerate() {
            if level.key.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Level at position {} has an empty key",
                    position
                )));
            }
            if index.insert(level.key.clone(), position).is_some() {
                return Err(Error::Config(format!("Duplicate level key '{}'", level.key)));
            }
        }

        for (position, level) in levels.iter().enumerate() {
            let expected = position.checked_sub(1).map(|p| levels[p].key.as_str());
            if level.depends_on.as_deref() != expected {
                return Err(Error::Config(match (expected, &level.depends_on) {
                    (None, Some(dep)) => format!(
                        "First level '{}' must not depend on anything (depends on '{}')",
                        level.key, dep
                    ),
                    (Some(prev), None) => format!(
                        "Level '{}' must depend on its predecessor '{}'",
                        level.key, prev
                    ),
                    (Some(prev), Some(dep)) => format!(
                        "Level '{}' depends on '{}' but must depend on its predecessor '{}'",
                        level.key, dep, prev
                    ),
                    (None, None) => unreachable!("matching dependencies are accepted"),
                }));
            }

            match level.kind {
                LevelKind::Identifier => {
                    if position + 1 != levels.len() {
                        return Err(Error::Config(format!(
                            "Identifier level '{}' must be the last level",
                            level.key
                        )));
                    }
                    if let Some(seed) = &level.seed_from {
                        match index.get(seed) {
                            Some(&seed_position) if seed_position < position => {}
                            _ => {
                                return Err(Error::Config(format!(
                                    "Identifier level '{}' seeds from '{}', which is not an earlier level",
                                    level.key, seed
                                )))
                            }
                        }
                    }
                }
                LevelKind::Suggested => {
                    if level.seed_from.is_some() {
                        return Err(Error::Config(format!(
                            "Level '{}' sets seed_from but is not an identifier level",
                            level.key
                        )));
                    }
                }
            }
        }

        Ok(Self { levels, index })
    }

    /// Build from config file entries; empty means the built-in hierarchy
    pub fn from_config(configs: &[LevelConfig]) -> Result<Self> {
        if configs.is_empty() {
            return Self::new(builtin_levels());
        }
        Self::new(configs.iter().map(Level::from).collect())
    }

    /// Built-in catalog → identifier hierarchy
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_levels())
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn get(&self, key: &str) -> Option<&Level> {
        self.index_of(key).map(|i| &self.levels[i])
    }

    pub fn at(&self, position: usize) -> Option<&Level> {
        self.levels.get(position)
    }

    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    /// Following level, or `None` if `key` is last (or unknown)
    pub fn next(&self, key: &str) -> Option<&Level> {
        self.index_of(key).and_then(|i| self.levels.get(i + 1))
    }

    /// Key `key` depends on, or `None` for the first level
    pub fn dependency_of(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|level| level.depends_on.as_deref())
    }

    /// Levels strictly after `key`
    pub fn downstream_of(&self, key: &str) -> &[Level] {
        match self.index_of(key) {
            Some(i) => &self.levels[i + 1..],
            None => &[],
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|level| level.key.as_str())
    }
}

/// catalog → category → subCategory → brand → model → year → color → identifier
pub fn builtin_levels() -> Vec<Level> {
    vec![
        Level::new("catalog", "Catalog", "Select or create a catalog...", None),
        Level::new("category", "Category", "Select category...", Some("catalog")),
        Level::new("subCategory", "Sub-Category", "Select sub-category...", Some("category")),
        Level::new("brand", "Brand", "Select brand...", Some("subCategory")),
        Level::new("model", "Model", "Select model...", Some("brand")),
        Level::new("year", "Year", "Select year...", Some("model")),
        Level::new("color", "Color", "Select color...", Some("year")),
        Level::new(
            "identifier",
            "UUID / Serial",
            "Select or generate UUID...",
            Some("color"),
        )
        .identifier(Some("model")),
    ]
}
