use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

/// Country of residence.
///
/// `Unknown` is the wire default for an unset value and is never a valid
/// stored state; every mutation rejects it before touching storage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Country {
    #[default]
    Unknown,
    En,
    It,
    Fr,
    De,
    Es,
}

impl Country {
    /// Whether this is a concrete country rather than the `Unknown` sentinel
    pub fn is_known(self) -> bool {
        !matches!(self, Country::Unknown)
    }
}

/// User entity as persisted in the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier, assigned on creation and never changed
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    /// Keyed hash of the password (never the plaintext, never exposed in responses)
    pub password_hash: String,
    pub country: Country,
    /// Creation timestamp, see [`crate::clock::format_timestamp`]
    pub created_at: String,
    /// Last update timestamp, see [`crate::clock::format_timestamp`]
    pub updated_at: String,
}

impl User {
    /// Build a freshly created user. Both timestamps start at `now`.
    pub fn new(id: String, input: NewUser, now: String) -> Self {
        Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            nickname: input.nickname,
            email: input.email,
            password_hash: input.password_hash,
            country: input.country,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Overwrite the fields present in `patch` and stamp `updated_at`.
    ///
    /// `updated_at` changes even when the patch is empty.
    pub fn apply_patch(&mut self, patch: UserPatch, now: String) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(nickname) = patch.nickname {
            self.nickname = nickname;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        self.updated_at = now;
    }
}

/// Caller-facing user shape (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: Country,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            email: user.email,
            country: user.country,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request to create a user
///
/// Missing fields deserialize to their zero value, so an absent `country`
/// arrives as [`Country::Unknown`] and is rejected.
#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct CreateUser {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub country: Country,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("country", &self.country)
            .finish()
    }
}

/// Response to a successful create
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    pub user: UserResponse,
}

/// Partial update request.
///
/// `None` leaves the stored field untouched; `Some("")` overwrites it with
/// an empty string.
#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    /// Target user. Filled from the path by the HTTP adapter.
    #[serde(default)]
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub country: Option<Country>,
}

impl std::fmt::Debug for UpdateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUser")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("country", &self.country)
            .finish()
    }
}

/// Fields handed to the gateway on create; the password is already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub country: Country,
}

/// Fields handed to the gateway on update; the password is already hashed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub country: Option<Country>,
}

/// Paginated listing query
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ListUsers {
    /// Only return users from this country
    pub filter_country: Option<Country>,
    /// Zero-based offset of the first result
    #[serde(default)]
    pub page: i64,
    /// Maximum number of results per page (0 means unlimited)
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    50
}

/// One page of users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserPage {
    pub results: Vec<UserResponse>,
    pub page: i64,
    pub page_size: i64,
    /// Number of results in this page
    pub total_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServingStatus {
    Up,
}

/// Liveness probe reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusReply {
    pub status: ServingStatus,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn stored_user() -> User {
        User {
            id: "1b8b24f8-a56b-4665-88f2-44e144389ce0".to_string(),
            first_name: "User 1".to_string(),
            last_name: "User 1 Lastname".to_string(),
            nickname: "User 1 Nickname".to_string(),
            email: "user1@test.com".to_string(),
            password_hash: "hash".to_string(),
            country: Country::It,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_country_wire_names() {
        assert_eq!(Country::En.to_string(), "EN");
        assert_eq!(Country::from_str("IT").unwrap(), Country::It);
        assert_eq!(serde_json::to_string(&Country::Unknown).unwrap(), "\"UNKNOWN\"");
        assert!(!Country::Unknown.is_known());
        assert!(Country::De.is_known());
    }

    #[test]
    fn test_create_user_missing_country_is_unknown() {
        let input: CreateUser = serde_json::from_str(r#"{"first_name":"a"}"#).unwrap();
        assert_eq!(input.country, Country::Unknown);
    }

    #[test]
    fn test_update_user_distinguishes_absent_from_empty() {
        let input: UpdateUser = serde_json::from_str(r#"{"nickname":""}"#).unwrap();
        assert_eq!(input.nickname, Some(String::new()));
        assert_eq!(input.first_name, None);
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut user = stored_user();
        let patch = UserPatch {
            email: Some("new@test.com".to_string()),
            ..Default::default()
        };

        user.apply_patch(patch, "2024-01-02T00:00:00.000Z".to_string());

        assert_eq!(user.email, "new@test.com");
        assert_eq!(user.first_name, "User 1");
        assert_eq!(user.country, Country::It);
        assert_eq!(user.created_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(user.updated_at, "2024-01-02T00:00:00.000Z");
    }

    #[test]
    fn test_response_omits_password_hash() {
        let json = serde_json::to_value(UserResponse::from(stored_user())).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["country"], "IT");
    }

    #[test]
    fn test_debug_redacts_password() {
        let input = CreateUser {
            password: "my_test_password".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", input).contains("my_test_password"));
    }
}
