//! Mood history and insight dashboard.

use serde::{Deserialize, Serialize};

use crate::api::VaultApi;
use crate::session::SessionToken;
use crate::Result;

/// One detected mood as returned by the mood history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodPoint {
    pub date: String,
    #[serde(default)]
    pub mood: String,
}

/// Latest generated insight text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default)]
    pub insight: String,
}

/// Chart-ready mood value for one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodSample {
    pub date: String,
    pub value: u8,
}

/// Everything the dashboard screen shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub mood_history: Vec<MoodSample>,
    pub insight: String,
}

/// Map a mood label to its chart value; unknown moods score 0.
pub fn mood_score(mood: &str) -> u8 {
    match mood.trim().to_lowercase().as_str() {
        "positive" => 3,
        "neutral" => 2,
        "negative" => 1,
        _ => 0,
    }
}

/// Axis label for a chart value.
pub const fn score_label(score: u8) -> Option<&'static str> {
    match score {
        1 => Some("Negative"),
        2 => Some("Neutral"),
        3 => Some("Positive"),
        _ => None,
    }
}

pub fn to_samples(points: &[MoodPoint]) -> Vec<MoodSample> {
    points
        .iter()
        .map(|point| MoodSample {
            date: point.date.clone(),
            value: mood_score(&point.mood),
        })
        .collect()
}

/// Fetch mood history and the latest insight concurrently.
pub async fn load_dashboard<A>(api: &A, token: &SessionToken, user_id: u64) -> Result<Dashboard>
where
    A: VaultApi + ?Sized,
{
    let (history, insight) = tokio::try_join!(
        api.mood_history(token, user_id),
        api.insight(token, user_id)
    )?;
    tracing::debug!("Loaded {} mood points", history.len());

    Ok(Dashboard {
        mood_history: to_samples(&history),
        insight: insight.insight,
    })
}
