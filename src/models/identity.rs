use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An identity returned by the identities endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Uuid,
    #[serde(rename = "providerDisplayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Lightweight identity embedded in other resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityReference {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A pull request reviewer together with their vote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityReferenceWithVote {
    #[serde(flatten)]
    pub identity: IdentityReference,
    #[serde(default)]
    pub vote: i32,
    #[serde(default)]
    pub is_container: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub voted_for: Vec<IdentityReferenceWithVote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_reads_provider_display_name() {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "id": "6a6d2a5f-3c2b-4c5e-9b8a-1d2e3f4a5b6c",
            "providerDisplayName": "Jane Doe",
            "isActive": true
        }))
        .unwrap();

        assert_eq!(identity.display_name, "Jane Doe");
        assert!(identity.is_active);
    }

    #[test]
    fn test_reviewer_flattens_identity() {
        let reviewer: IdentityReferenceWithVote = serde_json::from_value(serde_json::json!({
            "id": "6a6d2a5f-3c2b-4c5e-9b8a-1d2e3f4a5b6c",
            "displayName": "Reviewer",
            "vote": 10
        }))
        .unwrap();

        assert_eq!(reviewer.identity.display_name.as_deref(), Some("Reviewer"));
        assert_eq!(reviewer.vote, 10);
        assert!(reviewer.voted_for.is_empty());
    }
}
