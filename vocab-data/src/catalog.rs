//! The vocabulary catalog: every item the trainer can draw cards from, indexed by id.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::{VocabularyDataSource, VocabularyItem};

/// Categories that are kept in the catalog for reference but never practiced.
pub const DEFAULT_EXCLUDED_CATEGORIES: &[&str] = &["Prepositions", "Names", "Countries", "Cities"];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate vocabulary id `{0}`")]
    DuplicateId(String),
    #[error("failed to parse vocabulary catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read vocabulary catalog: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<VocabularyItem>,
    by_id: FxHashMap<String, usize>,
    excluded_categories: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi))]
pub struct SourceSummary {
    pub source: VocabularyDataSource,
    pub name: String,
    pub emoji: String,
    pub count: usize,
    /// Sources without practicable items are shown as "coming soon".
    pub available: bool,
}

impl Catalog {
    pub fn new(items: Vec<VocabularyItem>) -> Result<Self, CatalogError> {
        let mut by_id = FxHashMap::default();
        for (index, item) in items.iter().enumerate() {
            if by_id.insert(item.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self {
            items,
            by_id,
            excluded_categories: DEFAULT_EXCLUDED_CATEGORIES
                .iter()
                .map(|category| category.to_string())
                .collect(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<VocabularyItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let items: Vec<VocabularyItem> = serde_json::from_reader(reader)?;
        Self::new(items)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!(
            "Loaded {} vocabulary items from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// JSON schema of the catalog file format (an array of items).
    pub fn json_schema() -> Result<serde_json::Value, CatalogError> {
        let schema = schemars::schema_for!(Vec<VocabularyItem>);
        Ok(serde_json::to_value(schema)?)
    }

    /// Replaces the set of categories that are left out of practice.
    pub fn with_excluded_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every item, including the ones in excluded categories.
    pub fn all_items(&self) -> &[VocabularyItem] {
        &self.items
    }

    pub fn is_practicable(&self, item: &VocabularyItem) -> bool {
        item.category
            .as_ref()
            .is_none_or(|category| !self.excluded_categories.contains(category))
    }

    pub fn practice_items(&self) -> impl Iterator<Item = &VocabularyItem> {
        self.items
            .iter()
            .filter(move |item| self.is_practicable(item))
    }

    pub fn by_source(&self, source: VocabularyDataSource) -> impl Iterator<Item = &VocabularyItem> {
        self.practice_items()
            .filter(move |item| item.datasource == source)
    }

    pub fn by_sources<'a>(
        &'a self,
        sources: &'a [VocabularyDataSource],
    ) -> impl Iterator<Item = &'a VocabularyItem> {
        self.practice_items()
            .filter(move |item| sources.contains(&item.datasource))
    }

    pub fn get(&self, id: &str) -> Option<&VocabularyItem> {
        self.by_id
            .get(id)
            .map(|&index| &self.items[index])
            .filter(|item| self.is_practicable(item))
    }

    /// Number of practicable items, for one source or across the whole catalog.
    pub fn count(&self, source: Option<VocabularyDataSource>) -> usize {
        match source {
            Some(source) => self.by_source(source).count(),
            None => self.practice_items().count(),
        }
    }

    pub fn source_summaries(&self) -> Vec<SourceSummary> {
        VocabularyDataSource::ALL
            .into_iter()
            .map(|source| {
                let count = self.count(Some(source));
                SourceSummary {
                    source,
                    name: source.display_name().to_string(),
                    emoji: source.emoji().to_string(),
                    count,
                    available: count > 0,
                }
            })
            .collect()
    }
}
