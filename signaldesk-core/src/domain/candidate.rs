use serde::{Deserialize, Serialize};

/// A symbol-search result normalized for the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub symbol: String,
    pub display_name: String,
    pub exchange: String,
    pub is_qualified_source: bool,
}
