//! StudyNest API model types
//!
//! Response shapes for the StudyNest API, plus the envelope unwrapping the
//! API applies inconsistently across endpoints. Each endpoint wrapper in
//! [`StudyApi`](super::StudyApi) declares whether its response is enveloped;
//! nothing unwraps ad hoc at call sites.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::ApiError;

/// The `{ "data": ... }` wrapper some endpoints respond with.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Token pair plus profile returned by login and registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Display color as a hex string, chosen by the user.
    #[serde(default)]
    pub color: Option<String>,
    /// Exam date in `YYYY-MM-DD`, when one is set.
    #[serde(default)]
    pub exam_date: Option<String>,
    /// Self-assessed difficulty from 1 (easy) to 5 (hard).
    #[serde(default)]
    pub difficulty: Option<u8>,
}

/// Body for creating or updating a subject.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Planned,
    Completed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject_id: String,
    #[serde(default)]
    pub subject_name: Option<String>,
    /// Planned start as an RFC 3339 timestamp.
    pub starts_at: String,
    pub duration_minutes: u32,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// Plan date in `YYYY-MM-DD`.
    pub date: String,
    pub sessions: Vec<StudySession>,
    #[serde(default)]
    pub total_minutes: u32,
}

/// Body for requesting a generated plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub date: String,
    pub available_minutes: u32,
    pub subject_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub streak_days: u32,
    pub total_minutes: u64,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    /// RFC 3339 timestamp, present once the badge has been earned.
    #[serde(default)]
    pub earned_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Coach,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub sent_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LofiTrack {
    pub title: String,
    pub url: String,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LofiStation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    pub tracks: Vec<LofiTrack>,
}

/// Tokens minted by the refresh endpoint.
#[derive(Debug, Clone)]
pub(crate) struct MintedTokens {
    pub access: String,
    /// Present when the server rotates the refresh token as well.
    pub refresh: Option<String>,
}

/// Read the refresh response, which carries the new access token under
/// either a `token` or an `accessToken` key depending on API version.
pub(crate) fn to_minted_tokens(value: &Value) -> Result<MintedTokens, ApiError> {
    let access = value
        .get("token")
        .or_else(|| value.get("accessToken"))
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Decode("refresh response carried no access token".to_string()))?;
    let refresh = value
        .get("refreshToken")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(MintedTokens {
        access: access.to_string(),
        refresh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minted_tokens_from_token_key() {
        let minted = to_minted_tokens(&json!({ "token": "new" })).unwrap();
        assert_eq!(minted.access, "new");
        assert!(minted.refresh.is_none());
    }

    #[test]
    fn minted_tokens_from_access_token_key() {
        let minted =
            to_minted_tokens(&json!({ "accessToken": "new", "refreshToken": "rotated" })).unwrap();
        assert_eq!(minted.access, "new");
        assert_eq!(minted.refresh.as_deref(), Some("rotated"));
    }

    #[test]
    fn minted_tokens_rejects_missing_key() {
        let err = to_minted_tokens(&json!({ "message": "ok" })).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn envelope_unwraps_data() {
        let envelope: Envelope<Vec<Subject>> = serde_json::from_value(json!({
            "data": [{ "id": "s1", "name": "Linear Algebra", "difficulty": 4 }]
        }))
        .unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].name, "Linear Algebra");
        assert_eq!(envelope.data[0].difficulty, Some(4));
        assert!(envelope.data[0].exam_date.is_none());
    }

    #[test]
    fn session_status_uses_snake_case_wire_names() {
        let session: StudySession = serde_json::from_value(json!({
            "id": "x1",
            "subjectId": "s1",
            "startsAt": "2026-08-06T09:00:00Z",
            "durationMinutes": 50,
            "status": "planned"
        }))
        .unwrap();
        assert_eq!(session.status, SessionStatus::Planned);
        assert_eq!(session.duration_minutes, 50);
    }
}
