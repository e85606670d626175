use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authorization role of a user, with the stable numeric id used in
/// storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Stable storage id for this role.
    pub fn id(&self) -> u8 {
        match self {
            Role::Admin => 1,
            Role::User => 2,
        }
    }

    /// Resolves a role from its storage id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::User),
            _ => None,
        }
    }
}

/// Login credential row. Identity is the user id; the email is globally
/// unique, enforced through the unique-claim index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// User profile row, created once at signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Input to the signup flow. The password arrives raw so the policy check
/// can run on it; only its hash is ever persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}
