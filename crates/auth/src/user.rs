//! Identity records returned by the backend.
//!
//! Field names follow the backend's camelCase JSON so the same structs are used
//! for the wire, the durable store and the `user` cookie.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use kurum360_core::{DocumentId, EntityId};

use crate::{Role, RoleType};

/// Canonical user record (`/api/users/me?populate[]=role`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    #[serde(default)]
    pub document_id: DocumentId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ahi_ik_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl User {
    /// Role type, if the role relation was populated.
    pub fn role_type(&self) -> Option<RoleType> {
        self.role.as_ref().map(|r| r.kind)
    }

    /// Whether the account explicitly opted into the AHİ-İK module.
    pub fn has_ahi_ik_flag(&self) -> bool {
        self.ahi_ik_member == Some(true)
    }
}

/// Uploaded media reference (company logo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: EntityId,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Company profile owned by an `authenticated` (company) account.
///
/// Address and sector fields are not interpreted here; they are kept in
/// `extra` and round-trip unchanged through persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: EntityId,
    #[serde(default)]
    pub document_id: DocumentId,
    #[serde(default)]
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<Media>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_frozen: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_deserializes_backend_payload() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "documentId": "k2j3h4",
            "username": "acme",
            "email": "ceo@acme.com",
            "provider": "local",
            "confirmed": true,
            "blocked": false,
            "role": { "id": 1, "name": "Authenticated", "type": "authenticated" }
        }))
        .unwrap();

        assert_eq!(user.id, EntityId::new(7));
        assert_eq!(user.document_id.as_str(), "k2j3h4");
        assert_eq!(user.role_type(), Some(RoleType::Authenticated));
        assert_eq!(user.ahi_ik_member, None);
        assert!(!user.has_ahi_ik_flag());
    }

    #[test]
    fn company_profile_keeps_opaque_fields() {
        let raw = json!({
            "id": 3,
            "documentId": "cp-3",
            "companyName": "Acme",
            "email": "info@acme.com",
            "isFrozen": false,
            "address": "Istanbul",
            "sector": { "id": 9, "name": "Logistics" }
        });
        let profile: CompanyProfile = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(profile.company_name, "Acme");
        assert_eq!(profile.extra.get("address"), Some(&json!("Istanbul")));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back, raw);
    }
}
