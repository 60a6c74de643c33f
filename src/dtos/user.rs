//! User DTOs - accounts, profiles and settings

use crate::entities::{Profile, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// public view of an account, the password hash never leaves the server
#[derive(Serialize, Deserialize, Debug)]
pub struct UserDTO {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            username: value.username,
            created_at: value.created_at,
        }
    }
}

/// Registration body
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"))]
    pub username: String,

    #[validate(email(message = "Email is not valid"))]
    #[serde(default)]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
}

/// Login body (username and password only)
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

/// Profile page: account, profile fields and follow counters
#[derive(Serialize, Deserialize, Debug)]
pub struct ProfileDTO {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub followers: i64,
    pub following: i64,
    /// Whether the caller follows this user, None on the caller's own profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followed_by_me: Option<bool>,
    pub member_since: DateTime<Utc>,
}

impl ProfileDTO {
    pub fn build(user: User, profile: Option<Profile>, followers: i64, following: i64) -> Self {
        let (display_name, bio, avatar_url) = match profile {
            Some(p) => (p.display_name, p.bio, p.avatar_url),
            None => (None, None, None),
        };
        Self {
            user_id: user.user_id,
            username: user.username,
            display_name,
            bio,
            avatar_url,
            followers,
            following,
            followed_by_me: None,
            member_since: user.created_at,
        }
    }
}

/// Partial profile update from the settings page
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateProfileDTO {
    #[validate(length(max = 80, message = "Display name must be at most 80 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 500, message = "Avatar url must be at most 500 characters"))]
    pub avatar_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct ChangePasswordDTO {
    pub current_password: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub new_password: String,
}
