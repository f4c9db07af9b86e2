use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Row as stored in the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub password_hash: String,
    pub height: f64,
    pub weight: f64,
    pub age: i32,
    pub gender: String,
    pub goal: String,
    pub activity_factor: String,
    pub goal_macro_proteins: f64,
    pub goal_macro_carbs: f64,
    pub goal_macro_fats: f64,
    pub notes: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// User profile returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never sent to clients
    pub height: f64,
    pub weight: f64,
    pub age: i32,
    pub gender: String,
    pub goal: String,
    pub activity_factor: String,
    pub goal_macro_proteins: f64,
    pub goal_macro_carbs: f64,
    pub goal_macro_fats: f64,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            name: r.name,
            last_name: r.last_name,
            password_hash: r.password_hash,
            height: r.height,
            weight: r.weight,
            age: r.age,
            gender: r.gender,
            goal: r.goal,
            activity_factor: r.activity_factor,
            goal_macro_proteins: r.goal_macro_proteins,
            goal_macro_carbs: r.goal_macro_carbs,
            goal_macro_fats: r.goal_macro_fats,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Everything the store needs to insert a user; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub password_hash: String,
    pub height: f64,
    pub weight: f64,
    pub age: i32,
    pub gender: String,
    pub goal: String,
    pub activity_factor: String,
    pub goal_macro_proteins: f64,
    pub goal_macro_carbs: f64,
    pub goal_macro_fats: f64,
    pub notes: String,
}

impl NewUser {
    /// Materializes the row that gets inserted.
    pub fn into_row(self, id: Uuid, now: OffsetDateTime) -> UserRow {
        UserRow {
            id,
            email: self.email,
            name: self.name,
            last_name: self.last_name,
            password_hash: self.password_hash,
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
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` keeps the stored value, `Some` overwrites it (even with "" or 0).
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
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

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.last_name.is_none()
            && self.password_hash.is_none()
            && self.height.is_none()
            && self.weight.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.goal.is_none()
            && self.activity_factor.is_none()
            && self.goal_macro_proteins.is_none()
            && self.goal_macro_carbs.is_none()
            && self.goal_macro_fats.is_none()
            && self.notes.is_none()
    }

    /// Applies the present fields to `user` in place. Only the in-memory store needs this;
    /// Postgres does the same merge with `COALESCE`.
    #[cfg(test)]
    pub fn apply_to(self, user: &mut User) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        set(&mut user.name, self.name);
        set(&mut user.last_name, self.last_name);
        set(&mut user.password_hash, self.password_hash);
        set(&mut user.height, self.height);
        set(&mut user.weight, self.weight);
        set(&mut user.age, self.age);
        set(&mut user.gender, self.gender);
        set(&mut user.goal, self.goal);
        set(&mut user.activity_factor, self.activity_factor);
        set(&mut user.goal_macro_proteins, self.goal_macro_proteins);
        set(&mut user.goal_macro_carbs, self.goal_macro_carbs);
        set(&mut user.goal_macro_fats, self.goal_macro_fats);
        set(&mut user.notes, self.notes);
    }
}
