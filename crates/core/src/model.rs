//! Catalogue record types.
//!
//! A [`RecordSet`] is the joined, denormalized view of the two remote
//! documents: one [`WebsiteEntry`] per cataloged website, each carrying a
//! copy of its [`CategoryMetadata`] for detail views.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Error;

/// Category key used when a link entry declares none.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Icon key meaning "no icon"; presentation falls back to the site's favicon.
pub const DEFAULT_ICON: &str = "default";

/// Coarse environmental impact classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Impact {
    /// Normalize a raw impact string as declared by the categories document.
    ///
    /// Matching is case-insensitive; anything outside the three known levels,
    /// including padded values, collapses to [`Impact::Unknown`].
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "high" => Impact::High,
            "medium" => Impact::Medium,
            "low" => Impact::Low,
            _ => Impact::Unknown,
        }
    }

    /// Severity rank used by the impact sort orders.
    pub fn rank(self) -> u8 {
        match self {
            Impact::High => 3,
            Impact::Medium => 2,
            Impact::Low => 1,
            Impact::Unknown => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
            Impact::Unknown => "unknown",
        }
    }

    /// Display badge for cards and detail panels.
    pub fn badge(self) -> &'static str {
        match self {
            Impact::High => "🔴 High Impact",
            Impact::Medium => "🟡 Medium Impact",
            Impact::Low => "🟢 Low Impact",
            Impact::Unknown => "❓ Unknown",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active impact filter: everything, or a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImpactFilter {
    #[default]
    All,
    Only(Impact),
}

impl ImpactFilter {
    pub fn matches(self, impact: Impact) -> bool {
        match self {
            ImpactFilter::All => true,
            ImpactFilter::Only(level) => level == impact,
        }
    }
}

impl FromStr for ImpactFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(ImpactFilter::All),
            "high" => Ok(ImpactFilter::Only(Impact::High)),
            "medium" => Ok(ImpactFilter::Only(Impact::Medium)),
            "low" => Ok(ImpactFilter::Only(Impact::Low)),
            "unknown" => Ok(ImpactFilter::Only(Impact::Unknown)),
            other => Err(Error::InvalidInput(format!("unknown impact filter: {other}"))),
        }
    }
}

/// Yearly energy and emissions estimate for a category.
///
/// Values are display strings exactly as published by the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnualEstimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wh: Option<String>,
    #[serde(rename = "wh-comparison", default, skip_serializing_if = "Option::is_none")]
    pub wh_comparison: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<String>,
    #[serde(rename = "co2-comparison", default, skip_serializing_if = "Option::is_none")]
    pub co2_comparison: Option<String>,
}

impl AnnualEstimate {
    /// Build from a JSON value; only objects count as an estimate.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            wh: string_field(obj, "wh"),
            wh_comparison: string_field(obj, "wh-comparison"),
            co2: string_field(obj, "co2"),
            co2_comparison: string_field(obj, "co2-comparison"),
        })
    }
}

/// Shared impact metadata for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryMetadata {
    /// Impact as declared by the source, before normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_estimate: Option<AnnualEstimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl CategoryMetadata {
    /// Build from an arbitrary JSON value, dropping fields of the wrong type.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            impact: string_field(obj, "impact"),
            description: string_field(obj, "description"),
            annual_estimate: obj.get("annual_estimate").and_then(AnnualEstimate::from_value),
            source: string_field(obj, "source"),
        }
    }

    pub fn impact(&self) -> Impact {
        self.impact.as_deref().map(Impact::from_raw).unwrap_or_default()
    }

    /// Citation URL, if one is available.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// One cataloged website, joined with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteEntry {
    pub website: String,
    pub category: String,
    pub icon: String,
    pub impact: Impact,
    pub description: String,
    #[serde(rename = "categoryData", default)]
    pub category_data: CategoryMetadata,
}

impl WebsiteEntry {
    /// Whether the entry carries a real icon key rather than the sentinel.
    pub fn has_icon(&self) -> bool {
        !self.icon.is_empty() && self.icon != DEFAULT_ICON
    }

    pub fn category_name(&self) -> String {
        format_category_name(&self.category)
    }
}

/// Joined catalogue keyed by website identifier.
///
/// Every key equals its entry's `website`; deserializing a map that breaks
/// this fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordSet(BTreeMap<String, WebsiteEntry>);

impl<'de> Deserialize<'de> for RecordSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, WebsiteEntry>::deserialize(deserializer)?;
        if let Some((key, entry)) = entries.iter().find(|(key, entry)| **key != entry.website) {
            return Err(D::Error::custom(format!("record key {key} holds website {}", entry.website)));
        }
        Ok(Self(entries))
    }
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: WebsiteEntry) {
        self.0.insert(entry.website.clone(), entry);
    }

    pub fn get(&self, website: &str) -> Option<&WebsiteEntry> {
        self.0.get(website)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &WebsiteEntry> {
        self.0.values()
    }
}

impl FromIterator<WebsiteEntry> for RecordSet {
    fn from_iter<I: IntoIterator<Item = WebsiteEntry>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

/// Human-readable name for a category key (`video_streaming` -> `Video Streaming`).
pub fn format_category_name(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visit target for a website identifier.
pub fn website_url(website: &str) -> String {
    let trimmed = website.trim();
    if trimmed.starts_with("http") { trimmed.to_string() } else { format!("https://{trimmed}") }
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}
