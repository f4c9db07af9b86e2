use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{conflict_on_unique, parse_id, StoreError};
use crate::users::password::verify_password;
use crate::users::repo_types::{NewUser, User, UserPatch, UserRow};

const USER_COLUMNS: &str = "id, email, name, last_name, password_hash, height, weight, age, \
     gender, goal, activity_factor, goal_macro_proteins, goal_macro_carbs, goal_macro_fats, \
     notes, created_at, updated_at";

/// User persistence. Email is the lookup key for reads and writes; `id` is the primary key.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<User, StoreError>;
    async fn get_by_id(&self, id: &str) -> Result<User, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    /// Fails with `Conflict` when the email is already taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
    /// Returns the stored user after the patch has been applied.
    async fn update(&self, email: &str, patch: UserPatch) -> Result<User, StoreError>;
    async fn delete(&self, email: &str) -> Result<(), StoreError>;

    /// Login lookup. A wrong password is reported exactly like an unknown email.
    async fn get(&self, email: &str, password: &str) -> Result<User, StoreError> {
        let user = self.get_by_email(email).await?;
        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| StoreError::Password(e.to_string()))?;
        if !ok {
            return Err(StoreError::NotFound);
        }
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        row.map(User::from).ok_or(StoreError::NotFound)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        let id = parse_id(id, "user id")?;
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(User::from).ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let r = user.into_row(Uuid::new_v4(), OffsetDateTime::now_utc());
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, name, last_name, password_hash, height, weight, age,
                               gender, goal, activity_factor, goal_macro_proteins,
                               goal_macro_carbs, goal_macro_fats, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(r.id)
        .bind(&r.email)
        .bind(&r.name)
        .bind(&r.last_name)
        .bind(&r.password_hash)
        .bind(r.height)
        .bind(r.weight)
        .bind(r.age)
        .bind(&r.gender)
        .bind(&r.goal)
        .bind(&r.activity_factor)
        .bind(r.goal_macro_proteins)
        .bind(r.goal_macro_carbs)
        .bind(r.goal_macro_fats)
        .bind(&r.notes)
        .bind(r.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "user already exists"))?;
        Ok(User::from(row))
    }

    async fn update(&self, email: &str, patch: UserPatch) -> Result<User, StoreError> {
        if patch.is_empty() {
            return self.get_by_email(email).await;
        }
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                name                = COALESCE($2, name),
                last_name           = COALESCE($3, last_name),
                password_hash       = COALESCE($4, password_hash),
                height              = COALESCE($5, height),
                weight              = COALESCE($6, weight),
                age                 = COALESCE($7, age),
                gender              = COALESCE($8, gender),
                goal                = COALESCE($9, goal),
                activity_factor     = COALESCE($10, activity_factor),
                goal_macro_proteins = COALESCE($11, goal_macro_proteins),
                goal_macro_carbs    = COALESCE($12, goal_macro_carbs),
                goal_macro_fats     = COALESCE($13, goal_macro_fats),
                notes               = COALESCE($14, notes),
                updated_at          = now()
            WHERE email = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(patch.name)
        .bind(patch.last_name)
        .bind(patch.password_hash)
        .bind(patch.height)
        .bind(patch.weight)
        .bind(patch.age)
        .bind(patch.gender)
        .bind(patch.goal)
        .bind(patch.activity_factor)
        .bind(patch.goal_macro_proteins)
        .bind(patch.goal_macro_carbs)
        .bind(patch.goal_macro_fats)
        .bind(patch.notes)
        .fetch_optional(&self.db)
        .await?;
        row.map(User::from).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, email: &str) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
