use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// JSON body posted to the webhook once the user confirms the summary.
///
/// Field names are the wire keys the receiving automation expects, plus
/// `sessionId`/`submittedAt` so duplicate posts can be told apart.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub store_name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    pub session_id: Uuid,
    pub submitted_at: DateTime<Utc>,
}
