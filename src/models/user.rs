use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as stored, including the password hash.
///
/// Never serialized; convert to [`UserView`] before it leaves the service.
#[derive(Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish()
    }
}

/// Externally visible user. Structurally has no password field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
        }
    }
}

/// Data for a new user. The password is already hashed.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Login input.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Signup input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful login or signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: "u1".to_string(),
            username: "john".to_string(),
            email: "john@x.com".to_string(),
            password_hash: "$2b$04$secrethash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_view_has_no_password() {
        let view = UserView::from(record());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["email"], "john@x.com");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_record_debug_redacts_hash() {
        let output = format!("{:?}", record());
        assert!(output.contains("john@x.com"));
        assert!(!output.contains("secrethash"));
    }
}
