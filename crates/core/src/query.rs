//! Search, filter and sort over a joined [`RecordSet`].
//!
//! Scoring is tiered: a record earns the points of the first tier it
//! satisfies, checked from highest priority down, and nothing else.
//!
//! | tier | points |
//! |------|--------|
//! | exact identifier | 100 |
//! | identifier substring | 50 |
//! | category substring | 30 |
//! | description substring | 20 |
//! | icon substring | 15 |

use std::cmp::Ordering;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{ImpactFilter, RecordSet, WebsiteEntry, format_category_name};

/// Maximum number of suggestions returned for partial input.
pub const MAX_SUGGESTIONS: usize = 5;

/// Which tier a record matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    ExactIdentifier,
    Identifier,
    Category,
    Description,
    Icon,
}

impl MatchTier {
    pub fn points(self) -> u32 {
        match self {
            MatchTier::ExactIdentifier => 100,
            MatchTier::Identifier => 50,
            MatchTier::Category => 30,
            MatchTier::Description => 20,
            MatchTier::Icon => 15,
        }
    }
}

/// A record annotated with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredRecord {
    pub score: u32,
    #[serde(flatten)]
    pub entry: WebsiteEntry,
}

pub type ScoredList = Vec<ScoredRecord>;

/// Result of a free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank; show the default listing instead of matching.
    DefaultView,
    /// Matching records, highest score first.
    Ranked(ScoredList),
}

/// Reordering applied to an already computed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Relevance,
    Alphabetical,
    ImpactHigh,
    ImpactLow,
    Category,
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    /// Unrecognized values fall back to [`SortOrder::Relevance`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "alphabetical" => SortOrder::Alphabetical,
            "impact-high" => SortOrder::ImpactHigh,
            "impact-low" => SortOrder::ImpactLow,
            "category" => SortOrder::Category,
            _ => SortOrder::Relevance,
        })
    }
}

/// Records whose impact passes the filter, in record order.
pub fn filter_by_impact(records: &RecordSet, filter: ImpactFilter) -> RecordSet {
    records.iter().filter(|e| filter.matches(e.impact)).cloned().collect()
}

/// Score a single record against an already lower-cased query.
pub fn match_tier(entry: &WebsiteEntry, query: &str) -> Option<MatchTier> {
    let website = entry.website.to_lowercase();

    if website == query {
        Some(MatchTier::ExactIdentifier)
    } else if website.contains(query) {
        Some(MatchTier::Identifier)
    } else if entry.category.to_lowercase().contains(query)
        || format_category_name(&entry.category).to_lowercase().contains(query)
    {
        Some(MatchTier::Category)
    } else if entry.description.to_lowercase().contains(query) {
        Some(MatchTier::Description)
    } else if entry.icon.to_lowercase().contains(query) {
        Some(MatchTier::Icon)
    } else {
        None
    }
}

/// Case-insensitive relevance search.
///
/// Blank queries are not scored at all and yield [`SearchOutcome::DefaultView`].
pub fn search(records: &RecordSet, query: &str) -> SearchOutcome {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SearchOutcome::DefaultView;
    }

    let mut results: ScoredList = records
        .iter()
        .filter_map(|entry| {
            match_tier(entry, &query).map(|tier| ScoredRecord { score: tier.points(), entry: entry.clone() })
        })
        .collect();

    sort(&mut results, SortOrder::Relevance);
    SearchOutcome::Ranked(results)
}

/// Every record with a zero score, alphabetical.
pub fn default_view(records: &RecordSet) -> ScoredList {
    let mut all: ScoredList = records.iter().map(|entry| ScoredRecord { score: 0, entry: entry.clone() }).collect();
    sort(&mut all, SortOrder::Alphabetical);
    all
}

/// Reorder in place without rescoring. The sort is stable.
pub fn sort(list: &mut [ScoredRecord], order: SortOrder) {
    match order {
        SortOrder::Relevance => list.sort_by(|a, b| b.score.cmp(&a.score)),
        SortOrder::Alphabetical => list.sort_by(|a, b| locale_cmp(&a.entry.website, &b.entry.website)),
        SortOrder::ImpactHigh => list.sort_by(|a, b| b.entry.impact.rank().cmp(&a.entry.impact.rank())),
        SortOrder::ImpactLow => list.sort_by(|a, b| a.entry.impact.rank().cmp(&b.entry.impact.rank())),
        SortOrder::Category => list.sort_by(|a, b| locale_cmp(&a.entry.category, &b.entry.category)),
    }
}

/// Identifiers containing the typed text, for an autocomplete list.
pub fn suggestions<'a>(records: &'a RecordSet, text: &str) -> Vec<&'a str> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .map(|e| e.website.as_str())
        .filter(|website| website.to_lowercase().contains(&text))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Case-insensitive ordering with a byte-order tie break.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Query context owned by a presentation surface.
///
/// Holds the current record set, the active impact filter and the last
/// computed list so that later sorts reuse it without rescoring.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    records: RecordSet,
    filter: ImpactFilter,
    results: ScoredList,
}

impl QueryEngine {
    pub fn new(records: RecordSet) -> Self {
        let results = default_view(&records);
        Self { records, filter: ImpactFilter::All, results }
    }

    /// Last computed list.
    pub fn results(&self) -> &[ScoredRecord] {
        &self.results
    }

    /// Change the active filter and reset the listing to the filtered default view.
    pub fn set_filter(&mut self, filter: ImpactFilter) -> &[ScoredRecord] {
        self.filter = filter;
        self.results = default_view(&self.visible());
        &self.results
    }

    /// Run a query against the filtered subset.
    ///
    /// A blank query resets to the filtered default view and returns
    /// [`SearchOutcome::DefaultView`].
    pub fn query(&mut self, text: &str) -> SearchOutcome {
        let visible = self.visible();
        let outcome = search(&visible, text);
        self.results = match &outcome {
            SearchOutcome::DefaultView => default_view(&visible),
            SearchOutcome::Ranked(list) => list.clone(),
        };
        outcome
    }

    /// Reorder the last computed list.
    pub fn sort(&mut self, order: SortOrder) -> &[ScoredRecord] {
        sort(&mut self.results, order);
        &self.results
    }

    pub fn suggestions(&self, text: &str) -> Vec<&str> {
        suggestions(&self.records, text)
    }

    fn visible(&self) -> RecordSet {
        match self.filter {
            ImpactFilter::All => self.records.clone(),
            filter => filter_by_impact(&self.records, filter),
        }
    }
}
