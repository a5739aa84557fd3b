use serde::{Deserialize, Serialize};

/// Scoring timeframe for leaderboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Window {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "all-time")]
    AllTime,
    #[serde(rename = "newcomers")]
    Newcomers,
}

impl Default for Window {
    fn default() -> Self {
        Window::AllTime
    }
}

/// Derived, never persisted: a profile's standing for one window.
/// `score` is the raw (non-normalized) score; `rank` is 1-based and dense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    pub rank: u32,
    pub score: u64,
    pub views: u64,
    pub upvotes: u64,
    pub streak: u32,
    pub badges: Vec<String>,
    pub project_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_wire_names() {
        assert_eq!(
            serde_json::to_string(&Window::AllTime).unwrap(),
            "\"all-time\""
        );
        assert_eq!(
            serde_json::from_str::<Window>("\"newcomers\"").unwrap(),
            Window::Newcomers
        );
    }
}
