use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Medication
// ---------------------------------------------------------------------------

/// The drug identity. Carries no scheduling state of its own; recurrence
/// lives on the schedules owned by this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub owner_id: String,
    pub profile_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medication {
    /// Create a new medication with a fresh id and store-side timestamps.
    pub fn new(
        owner_id: impl Into<String>,
        profile_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            profile_id: profile_id.into(),
            name: name.into(),
            notes: None,
            url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medication_new_defaults() {
        let med = Medication::new("local", "self", "ibuprofen");
        assert_eq!(med.name, "ibuprofen");
        assert_eq!(med.owner_id, "local");
        assert_eq!(med.profile_id, "self");
        assert!(!med.id.is_empty());
        assert!(med.notes.is_none());
        assert!(med.url.is_none());
        assert_eq!(med.created_at, med.updated_at);
    }

    #[test]
    fn medication_serde_roundtrip() {
        let mut med = Medication::new("local", "self", "metformin");
        med.notes = Some("with food".to_string());
        let json = serde_json::to_string(&med).unwrap();
        let back: Medication = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, med.id);
        assert_eq!(back.notes.as_deref(), Some("with food"));
    }
}
