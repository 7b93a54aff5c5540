use serde::{Deserialize, Serialize};

/// Postal address embedded in every user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

/// Company affiliation; the remote payload uses camelCase for catchPhrase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase", skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bs: Option<String>,
}

/// A user record. Identity is `id`, unique within the store.
///
/// Optional fields are explicit `Option`s; presence is checked before any
/// dependent rendering, never inferred from a missing key at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

/// Partial update for a user. `None` fields preserve the existing value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<Address>,
    pub company: Option<Company>,
}

impl User {
    /// Shallow merge: fields present in the patch override, everything else
    /// (including `id`) is preserved. Returns a new record; the original is
    /// never mutated in place.
    pub fn merged(&self, patch: UserPatch) -> User {
        User {
            id: self.id,
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            username: patch.username.or_else(|| self.username.clone()),
            email: patch.email.unwrap_or_else(|| self.email.clone()),
            phone: patch.phone.unwrap_or_else(|| self.phone.clone()),
            website: patch.website.or_else(|| self.website.clone()),
            address: patch.address.unwrap_or_else(|| self.address.clone()),
            company: patch.company.or_else(|| self.company.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Leanne Graham".to_string(),
            username: Some("Bret".to_string()),
            email: "Sincere@april.biz".to_string(),
            phone: "17706361234".to_string(),
            website: Some("hildegard.org".to_string()),
            address: Address {
                street: "Kulas Light".to_string(),
                suite: "Apt. 556".to_string(),
                city: "Gwenborough".to_string(),
                zipcode: "92998-3874".to_string(),
            },
            company: Some(Company {
                name: "Romaguera-Crona".to_string(),
                catch_phrase: Some("Multi-layered client-server neural-net".to_string()),
                bs: None,
            }),
        }
    }

    #[test]
    fn test_merged_overrides_only_patched_fields() {
        let user = sample_user();
        let patch = UserPatch {
            name: Some("Changed".to_string()),
            ..UserPatch::default()
        };
        let merged = user.merged(patch);
        assert_eq!(merged.id, 1);
        assert_eq!(merged.name, "Changed");
        assert_eq!(merged.email, user.email);
        assert_eq!(merged.phone, user.phone);
        assert_eq!(merged.address, user.address);
        assert_eq!(merged.company, user.company);
    }

    #[test]
    fn test_merged_empty_patch_is_identity() {
        let user = sample_user();
        let merged = user.merged(UserPatch::default());
        assert_eq!(merged, user);
    }

    #[test]
    fn test_decode_remote_payload_shape() {
        // Matches the remote endpoint's shape, including nested keys we
        // don't model (geo) and all optional fields present.
        let body = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username.as_deref(), Some("Bret"));
        assert_eq!(user.address.city, "Gwenborough");
        let company = user.company.unwrap();
        assert_eq!(company.name, "Romaguera-Crona");
        assert!(company.catch_phrase.is_some());
    }

    #[test]
    fn test_decode_minimal_record() {
        // Locally-created records omit username, website, and company.
        let body = r#"{
            "id": 11,
            "name": "Ann Smith",
            "email": "ann@example.com",
            "phone": "12345678",
            "address": { "street": "Main St", "suite": "1A", "city": "Springfield", "zipcode": "" }
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert!(user.username.is_none());
        assert!(user.website.is_none());
        assert!(user.company.is_none());
    }
}
