use serde::{Deserialize, Serialize};

use crate::users::repo_types::{NewUser, User, UserPatch};

const DEFAULT_ACTIVITY_FACTOR: &str = "1.2";

/// Body of `POST /users`. Only `email` is required.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub activity_factor: String,
    #[serde(default)]
    pub goal_macro_proteins: f64,
    #[serde(default)]
    pub goal_macro_carbs: f64,
    #[serde(default)]
    pub goal_macro_fats: f64,
    #[serde(default)]
    pub notes: String,
}

impl CreateUserRequest {
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        let activity_factor = if self.activity_factor.trim().is_empty() {
            DEFAULT_ACTIVITY_FACTOR.to_string()
        } else {
            self.activity_factor
        };
        NewUser {
            email: self.email,
            name: self.name,
            last_name: self.last_name,
            password_hash,
            height: self.height,
            weight: self.weight,
            age: self.age,
            gender: self.gender,
            goal: self.goal,
            activity_factor,
            goal_macro_proteins: self.goal_macro_proteins,
            goal_macro_carbs: self.goal_macro_carbs,
            goal_macro_fats: self.goal_macro_fats,
            notes: self.notes,
        }
    }
}

/// Body of `PUT /users/:email`. Absent or `null` fields are left as stored.
/// The email itself comes from the path and cannot be changed.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub goal: Option<String>,
    pub activity_factor: Option<String>,
    pub goal_macro_proteins: Option<f64>,
    pub goal_macro_carbs: Option<f64>,
    pub goal_macro_fats: Option<f64>,
    pub notes: Option<String>,
}

impl UpdateUserRequest {
    /// `password_hash` must be the hash of `self.password` when one was supplied.
    pub fn into_patch(self, password_hash: Option<String>) -> UserPatch {
        UserPatch {
            name: self.name,
            last_name: self.last_name,
            password_hash,
            height: self.height,
            weight: self.weight,
            age: self.age,
            gender: self.gender,
            goal: self.goal,
            activity_factor: self.activity_factor,
            goal_macro_proteins: self.goal_macro_proteins,
            goal_macro_carbs: self.goal_macro_carbs,
            goal_macro_fats: self.goal_macro_fats,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}
