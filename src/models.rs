use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub content: String,
    pub used_on: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Affirmation {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AffirmationLog {
    pub id: i64,
    pub affirmation_id: i64,
    pub completed_at: DateTime<Utc>,
}

/// `entry_date` is the local calendar day the item was logged for, `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GratitudeItem {
    pub id: i64,
    pub content: String,
    pub entry_date: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GratitudeEntry {
    pub date: String,
    pub items: Vec<GratitudeItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreativityEntry {
    pub id: i64,
    pub content: String,
    pub entry_date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaysAnsweredQuestion {
    pub answer: Option<Answer>,
    pub question: Option<Question>,
}

// ─── Dashboard ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub is_current_month: bool,
    pub has_answer: bool,
    pub has_affirmation: bool,
    pub has_gratitude: bool,
    pub has_creativity: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_answers: u64,
    pub total_affirmations: u64,
    pub total_gratitude_items: u64,
    pub total_creativity_entries: u64,
    pub total_answer_days: u64,
    pub total_affirmation_days: u64,
    pub total_gratitude_days: u64,
    pub total_creativity_days: u64,
    pub current_affirmation_streak: u32,
    pub current_gratitude_streak: u32,
    pub current_creativity_streak: u32,
    /// Highest of the three current streaks, not a historical maximum.
    pub longest_streak: u32,
    pub completion_rate: u32,
}

// ─── Bulk transfer ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    pub affirmations: Vec<Affirmation>,
    pub affirmation_logs: Vec<AffirmationLog>,
    pub gratitude_items: Vec<GratitudeItem>,
    pub creativity_entries: Vec<CreativityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub questions: u64,
    pub answers: u64,
    pub affirmations: u64,
    pub affirmation_logs: u64,
    pub gratitude_items: u64,
    pub creativity_entries: u64,
}
