//! Joins the links and categories documents into a [`RecordSet`].
//!
//! The join is a left join anchored on the links document: every link entry
//! produces exactly one [`WebsiteEntry`], whether or not its category exists.

use serde::de::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::model::{
    CategoryMetadata, DEFAULT_ICON, Impact, RecordSet, UNKNOWN_CATEGORY, WebsiteEntry, format_category_name,
};

/// Website → category mapping as served by the data source.
///
/// Entries are kept as raw JSON so one malformed entry cannot fail the
/// whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinksDocument(Map<String, Value>);

/// Category → impact metadata mapping as served by the data source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoriesDocument(Map<String, Value>);

impl LinksDocument {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl CategoriesDocument {
    /// Metadata for a category key; unknown keys yield empty metadata.
    pub fn lookup(&self, key: &str) -> CategoryMetadata {
        self.0.get(key).map(CategoryMetadata::from_value).unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for LinksDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self)
    }
}

impl<'de> Deserialize<'de> for CategoriesDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self)
    }
}

/// One link entry after resolving both accepted shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LinkFields {
    category: Option<String>,
    icon: Option<String>,
    description: Option<String>,
}

impl LinkFields {
    /// A bare string is a category key; an object carries `categories`
    /// (preferred) or the older `category` field.
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(key) => Self { category: non_empty(Some(key.as_str())), ..Default::default() },
            Value::Object(obj) => {
                let field = |name: &str| non_empty(obj.get(name).and_then(Value::as_str));
                Self {
                    category: field("categories").or_else(|| field("category")),
                    icon: field("icon"),
                    description: field("description"),
                }
            }
            _ => Self::default(),
        }
    }
}

/// Number of joined entries per impact level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactStats {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
}

impl ImpactStats {
    fn record(&mut self, impact: Impact) {
        match impact {
            Impact::High => self.high += 1,
            Impact::Medium => self.medium += 1,
            Impact::Low => self.low += 1,
            Impact::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low + self.unknown
    }
}

/// Join both documents into one record per link entry.
pub fn join(links: &LinksDocument, categories: &CategoriesDocument) -> RecordSet {
    join_with_stats(links, categories).0
}

/// Same as [`join`], also returning the impact distribution.
pub fn join_with_stats(links: &LinksDocument, categories: &CategoriesDocument) -> (RecordSet, ImpactStats) {
    let mut records = RecordSet::new();
    let mut stats = ImpactStats::default();

    for (website, value) in &links.0 {
        let fields = LinkFields::from_value(value);
        let category = fields.category.unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
        let category_data = categories.lookup(&category);
        let impact = category_data.impact();

        let description = fields
            .description
            .or_else(|| category_data.description().map(str::to_string))
            .unwrap_or_else(|| synthesize_description(&category, impact));

        stats.record(impact);
        records.insert(WebsiteEntry {
            website: website.clone(),
            icon: fields.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            category,
            impact,
            description,
            category_data,
        });
    }

    tracing::debug!(
        total = stats.total(),
        high = stats.high,
        medium = stats.medium,
        low = stats.low,
        unknown = stats.unknown,
        "joined catalogue"
    );

    (records, stats)
}

/// Fallback description when neither the link nor its category has one.
pub fn synthesize_description(category: &str, impact: Impact) -> String {
    format!("{} website with {} environmental impact", format_category_name(category), impact)
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty()).map(str::to_string)
}
