//! Shared data types for the launcher backend contract.
//!
//! These types mirror the backend's wire schema exactly. The front end never
//! inspects result content beyond this schema; it only orders, displays, and
//! forwards selections.

use serde::{Deserialize, Serialize};

/// One entry in a search response.
///
/// Immutable once received; the order of results in a response is the
/// backend's ranking order and must be preserved by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Opaque backend identifier, forwarded verbatim on execute.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Inline image data (e.g. a data URI). Absent means the presenter
    /// falls back to a category glyph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Display grouping key; consecutive runs share one visible header.
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// One action in a context menu, scoped to a single open menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextAction {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
}

/// Indexer lifecycle states pushed by the backend.
///
/// The tag set is backend-owned; anything we do not recognize is carried
/// losslessly so new states degrade gracefully instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IndexState {
    Checking,
    Indexing,
    Ready,
    Idle,
    Unknown(String),
}

impl From<String> for IndexState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "checking" => IndexState::Checking,
            "indexing" => IndexState::Indexing,
            "ready" => IndexState::Ready,
            "idle" => IndexState::Idle,
            _ => IndexState::Unknown(s),
        }
    }
}

impl From<IndexState> for String {
    fn from(state: IndexState) -> Self {
        match state {
            IndexState::Checking => "checking".to_string(),
            IndexState::Indexing => "indexing".to_string(),
            IndexState::Ready => "ready".to_string(),
            IndexState::Idle => "idle".to_string(),
            IndexState::Unknown(s) => s,
        }
    }
}

/// Index status push event (`index_status` notification).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatus {
    pub state: IndexState,
    #[serde(default)]
    pub message: String,
    /// Progress counter (items indexed so far).
    #[serde(default)]
    pub count: u64,
}

/// Closed response vocabulary for `execute` and `execute_context_action`.
///
/// Unrecognized tags are treated as silent success by the front end, never
/// as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseTag {
    Ok,
    Copied,
    Other(String),
}

impl From<String> for ResponseTag {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ok" => ResponseTag::Ok,
            "copied" => ResponseTag::Copied,
            _ => ResponseTag::Other(s),
        }
    }
}

impl From<ResponseTag> for String {
    fn from(tag: ResponseTag) -> Self {
        match tag {
            ResponseTag::Ok => "ok".to_string(),
            ResponseTag::Copied => "copied".to_string(),
            ResponseTag::Other(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_optional_fields_default() {
        let json = r#"{"id":"app-1","title":"Notes"}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.id, "app-1");
        assert_eq!(result.subtitle, "");
        assert!(result.icon.is_none());
        assert!(result.path.is_none());
    }

    #[test]
    fn test_search_result_full_roundtrip() {
        let result = SearchResult {
            id: "app-1".to_string(),
            title: "Notes".to_string(),
            subtitle: "Application".to_string(),
            icon: Some("data:image/png;base64,AAAA".to_string()),
            category: "Applications".to_string(),
            path: Some("/Applications/Notes.app".to_string()),
        };
        let json = serde_json::to_string(&result).unwrap();
        let parsed: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_index_state_known_tags() {
        let status: IndexStatus =
            serde_json::from_str(r#"{"state":"indexing","message":"Indexing files","count":120}"#)
                .unwrap();
        assert_eq!(status.state, IndexState::Indexing);
        assert_eq!(status.count, 120);
    }

    #[test]
    fn test_index_state_unknown_tag_is_lossless() {
        let state: IndexState = serde_json::from_str("\"rebalancing\"").unwrap();
        assert_eq!(state, IndexState::Unknown("rebalancing".to_string()));
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"rebalancing\"");
    }

    #[test]
    fn test_response_tag_vocabulary() {
        assert_eq!(
            serde_json::from_str::<ResponseTag>("\"ok\"").unwrap(),
            ResponseTag::Ok
        );
        assert_eq!(
            serde_json::from_str::<ResponseTag>("\"copied\"").unwrap(),
            ResponseTag::Copied
        );
        assert_eq!(
            serde_json::from_str::<ResponseTag>("\"not found\"").unwrap(),
            ResponseTag::Other("not found".to_string())
        );
    }
}
