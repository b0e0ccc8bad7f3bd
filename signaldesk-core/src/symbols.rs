//! Symbol autocomplete: candidate filtering, suggestion state and the
//! stale-response guard.
//!
//! Filtering is a strict allow-list, not fuzzy matching: a hit survives only
//! if it comes from a qualified source and its exchange label contains the
//! configured marker. Order among survivors is the order the search service
//! returned.

use serde::{Deserialize, Serialize};

use crate::data::wire::SearchQuote;
use crate::domain::SearchCandidate;

/// Candidate filter for the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolMatcher {
    /// Queries shorter than this (after trimming) never search.
    pub min_query_len: usize,
    /// Substring the exchange label must contain, compared case-insensitively.
    pub exchange_marker: String,
}

impl Default for SymbolMatcher {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            exchange_marker: "NSE".into(),
        }
    }
}

impl SymbolMatcher {
    pub fn new(min_query_len: usize, exchange_marker: impl Into<String>) -> Self {
        Self {
            min_query_len,
            exchange_marker: exchange_marker.into(),
        }
    }

    /// Whether `query` is long enough to trigger a search.
    pub fn should_search(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_len
    }

    /// Whether a normalized candidate passes both filters.
    pub fn accepts(&self, candidate: &SearchCandidate) -> bool {
        candidate.is_qualified_source
            && candidate
                .exchange
                .to_lowercase()
                .contains(&self.exchange_marker.to_lowercase())
    }

    /// Filter raw search hits down to qualified candidates.
    ///
    /// Returns nothing when the query is too short, whatever `raw` holds.
    pub fn filter_candidates(&self, query: &str, raw: &[SearchQuote]) -> Vec<SearchCandidate> {
        if !self.should_search(query) {
            return Vec::new();
        }
        raw.iter()
            .filter_map(to_candidate)
            .filter(|c| self.accepts(c))
            .collect()
    }
}

/// Normalize a raw hit. Hits without a symbol are dropped.
pub fn to_candidate(quote: &SearchQuote) -> Option<SearchCandidate> {
    let symbol = quote
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();
    let display_name = best_display_name(quote).unwrap_or_else(|| symbol.clone());
    Some(SearchCandidate {
        symbol,
        display_name,
        exchange: quote.exch_disp.clone().unwrap_or_default(),
        is_qualified_source: quote.is_yahoo_finance.unwrap_or(false),
    })
}

/// First non-empty of short name, long name, generic name.
pub fn best_display_name(quote: &SearchQuote) -> Option<String> {
    [&quote.shortname, &quote.longname, &quote.name]
        .into_iter()
        .filter_map(|n| n.as_deref())
        .map(str::trim)
        .find(|n| !n.is_empty())
        .map(str::to_string)
}

/// Monotonic request counter for autocomplete lookups.
///
/// Every query that goes out takes the next number. A response is applied
/// only if its number is the latest one issued; anything older is stale.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the number for a new request. Also invalidates everything in flight.
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// The symbol the user committed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub symbol: String,
    pub display_name: String,
}

/// Events that drive the suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionEvent {
    /// The query text changed. Short queries close the list.
    QueryChanged(String),
    /// Filtered results for the current query arrived.
    ResultsArrived(Vec<SearchCandidate>),
    /// The user picked the candidate at this position.
    CandidateSelected(usize),
    /// Focus left the search field (click outside, escape).
    FocusLost,
}

/// Suggestion list state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SuggestionState {
    #[default]
    Closed,
    Open { candidates: Vec<SearchCandidate> },
}

/// `Closed → Open → Closed` state machine for the suggestion list.
#[derive(Debug, Clone, Default)]
pub struct SuggestionBox {
    matcher: SymbolMatcher,
    query: String,
    state: SuggestionState,
    selection: Option<Selection>,
}

impl SuggestionBox {
    pub fn new(matcher: SymbolMatcher) -> Self {
        Self {
            matcher,
            ..Self::default()
        }
    }

    pub fn matcher(&self) -> &SymbolMatcher {
        &self.matcher
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SuggestionState::Open { .. })
    }

    pub fn candidates(&self) -> &[SearchCandidate] {
        match &self.state {
            SuggestionState::Open { candidates } => candidates,
            SuggestionState::Closed => &[],
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Apply an event. Returns the selection when the event committed one.
    pub fn apply(&mut self, event: SuggestionEvent) -> Option<Selection> {
        match event {
            SuggestionEvent::QueryChanged(query) => {
                if !self.matcher.should_search(&query) {
                    self.state = SuggestionState::Closed;
                }
                self.query = query;
                None
            }
            SuggestionEvent::ResultsArrived(candidates) => {
                self.state = if candidates.is_empty() || !self.matcher.should_search(&self.query) {
                    SuggestionState::Closed
                } else {
                    SuggestionState::Open { candidates }
                };
                None
            }
            SuggestionEvent::CandidateSelected(index) => {
                let picked = self.candidates().get(index).cloned()?;
                let selection = Selection {
                    symbol: picked.symbol.clone(),
                    display_name: picked.display_name,
                };
                self.query = picked.symbol;
                self.state = SuggestionState::Closed;
                self.selection = Some(selection.clone());
                Some(selection)
            }
            SuggestionEvent::FocusLost => {
                self.state = SuggestionState::Closed;
                None
            }
        }
    }
}
