//! Shared leaderboard
//!
//! Scores are posted to a spreadsheet-backed web app after every round and the
//! top 10 are fetched on demand. The server owns ordering; ties keep their
//! submission order.

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::LEADERBOARD_ROWS;
use crate::profile::PlayerProfile;

/// Leaderboard I/O failures. Never fatal; shown as a status line.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with HTTP {0}")]
    Http(u16),
    #[error("malformed leaderboard response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("leaderboard request rejected (status `{0}`)")]
    Rejected(String),
}

/// One row as served by the spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    #[serde(rename = "position", default)]
    pub role: String,
    #[serde(deserialize_with = "lenient_score")]
    pub score: u64,
}

/// Payload posted after a round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSubmission {
    pub name: String,
    #[serde(rename = "position")]
    pub role: String,
    pub score: u64,
}

impl ScoreSubmission {
    pub fn new(profile: &PlayerProfile, score: u64) -> Self {
        Self {
            name: profile.name.clone(),
            role: profile.role.clone(),
            score,
        }
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    status: String,
    #[serde(default)]
    leaderboard: Vec<LeaderboardEntry>,
}

/// Spreadsheet cells come back as numbers or strings depending on formatting
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Int(u64),
        Float(f64),
        Text(String),
    }

    match Cell::deserialize(deserializer)? {
        Cell::Int(n) => Ok(n),
        Cell::Float(f) if f.is_finite() && f >= 0.0 => Ok(f as u64),
        Cell::Float(f) => Err(serde::de::Error::custom(format!("invalid score {}", f))),
        Cell::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid score `{}`", s))),
    }
}

/// Decode a GET response body
pub fn parse_response(body: &str) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
    let response: LeaderboardResponse = serde_json::from_str(body)?;
    if response.status != "success" {
        return Err(LeaderboardError::Rejected(response.status));
    }
    Ok(response.leaderboard)
}

/// A row ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// 1-indexed
    pub place: usize,
    pub entry: LeaderboardEntry,
}

impl RankedEntry {
    /// Medal for the podium places
    pub fn medal(&self) -> Option<&'static str> {
        match self.place {
            1 => Some("🥇"),
            2 => Some("🥈"),
            3 => Some("🥉"),
            _ => None,
        }
    }

    /// Text for the place column, e.g. "🥇 1" or "7"
    pub fn place_label(&self) -> String {
        match self.medal() {
            Some(medal) => format!("{} {}", medal, self.place),
            None => self.place.to_string(),
        }
    }
}

/// First [`LEADERBOARD_ROWS`] entries in server order
pub fn top_entries(entries: &[LeaderboardEntry]) -> Vec<RankedEntry> {
    entries
        .iter()
        .take(LEADERBOARD_ROWS)
        .enumerate()
        .map(|(i, entry)| RankedEntry {
            place: i + 1,
            entry: entry.clone(),
        })
        .collect()
}

/// Submission status indicator on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saving,
    Saved,
    Failed,
}

impl SaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Saving => "💾 SAVING...",
            SaveStatus::Saved => "✅ SAVED!",
            SaveStatus::Failed => "❌ SAVE FAILED",
        }
    }
}

/// Guards leaderboard submissions against duplicates and stale completions.
///
/// Each round submits at most once, and only the latest round's completion
/// may update the status line.
#[derive(Debug, Clone, Default)]
pub struct SubmissionTracker {
    latest_round: Option<u32>,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the submission for `round`. False if it was already claimed or a
    /// newer round has submitted since.
    pub fn begin(&mut self, round: u32) -> bool {
        if self.latest_round.is_some_and(|latest| latest >= round) {
            log::warn!("Duplicate submission for round {} ignored", round);
            return false;
        }
        self.latest_round = Some(round);
        true
    }

    /// Whether a completion for `round` may still touch the UI
    pub fn is_current(&self, round: u32) -> bool {
        self.latest_round == Some(round)
    }
}

/// Post a score. The request is `no-cors`, so success only means the request
/// left the browser.
#[cfg(target_arch = "wasm32")]
pub async fn submit(url: &str, submission: &ScoreSubmission) -> Result<(), LeaderboardError> {
    use wasm_bindgen::JsValue;
    use web_sys::{Request, RequestInit, RequestMode};

    let body = submission.to_json()?;
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::NoCors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "text/plain;charset=utf-8")
        .map_err(js_error)?;

    send(&request).await?;
    log::info!(
        "Submitted score {} for {} ({})",
        submission.score,
        submission.name,
        submission.role
    );
    Ok(())
}

/// Fetch the full leaderboard in server order
#[cfg(target_arch = "wasm32")]
pub async fn fetch(url: &str) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
    use wasm_bindgen_futures::JsFuture;
    use web_sys::Request;

    let request = Request::new_with_str(url).map_err(js_error)?;
    let response = send(&request).await?;
    if !response.ok() {
        return Err(LeaderboardError::Http(response.status()));
    }
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| LeaderboardError::Network("response body is not text".to_string()))?;

    let entries = parse_response(&text)?;
    log::info!("Fetched {} leaderboard entries", entries.len());
    Ok(entries)
}

#[cfg(target_arch = "wasm32")]
async fn send(request: &web_sys::Request) -> Result<web_sys::Response, LeaderboardError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| LeaderboardError::Network("no window".to_string()))?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_error)?;
    value.dyn_into().map_err(js_error)
}

#[cfg(target_arch = "wasm32")]
fn js_error(e: wasm_bindgen::JsValue) -> LeaderboardError {
    LeaderboardError::Network(format!("{:?}", e))
}
