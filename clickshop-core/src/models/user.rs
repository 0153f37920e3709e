use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, controlling which surfaces a session may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Employee,
    Administrator,
}

impl Role {
    /// Whether the role may use the back-office surfaces (billing,
    /// inventory).
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Employee | Role::Administrator)
    }
}

/// Account status; blocked accounts cannot establish a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// An account record in the user directory.
///
/// The email address is the lookup key (case-insensitive) and is unique
/// across the directory. Records are never deleted; access is revoked by
/// flipping `status` to blocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, the directory lookup key
    pub email: String,

    /// Bcrypt hashed password
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Active or blocked
    pub status: AccountStatus,

    /// Timestamp of the most recent successful login
    pub last_login: Option<DateTime<Utc>>,

    /// Preferred clothing size (customers only)
    pub size: Option<String>,

    /// Self-reported gender (customers only)
    pub gender: Option<Gender>,
}

/// Registration request.
///
/// Employee and Administrator registrations must present the matching
/// shared secret; customers register without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub secret_key: Option<String>,
    pub size: Option<String>,
    pub gender: Option<Gender>,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User response (public representation, excludes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub size: Option<String>,
    pub gender: Option<Gender>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            last_login: user.last_login,
            size: user.size,
            gender: user.gender,
        }
    }
}
