use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{conflict_on_unique, parse_id, StoreError};
use crate::meal_plans::repo_types::{MealPlan, MealPlanPatch, MealPlanRow, NewMealPlan};

const PLAN_COLUMNS: &str = "id, user_id, monday, tuesday, wednesday, thursday, friday, \
     saturday, sunday, created_at, updated_at";

/// Meal plan persistence. Plans are keyed by id; `user_id` is a unique secondary key.
#[async_trait]
pub trait MealPlanStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<MealPlan, StoreError>;
    async fn get_by_user_id(&self, user_id: &str) -> Result<MealPlan, StoreError>;
    async fn list(&self) -> Result<Vec<MealPlan>, StoreError>;
    /// Fails with `Conflict` when the user already owns a plan.
    async fn create(&self, plan: NewMealPlan) -> Result<MealPlan, StoreError>;
    /// Replaces the day buckets present in `patch` and returns the stored plan.
    async fn update(&self, id: &str, patch: MealPlanPatch) -> Result<MealPlan, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgMealPlanStore {
    db: PgPool,
}

impl PgMealPlanStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealPlanStore for PgMealPlanStore {
    async fn get(&self, id: &str) -> Result<MealPlan, StoreError> {
        let id = parse_id(id, "meal plan id")?;
        let row = sqlx::query_as::<_, MealPlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM meal_plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(MealPlan::from).ok_or(StoreError::NotFound)
    }

    async fn get_by_user_id(&self, user_id: &str) -> Result<MealPlan, StoreError> {
        let user_id = parse_id(user_id, "user id")?;
        let row = sqlx::query_as::<_, MealPlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM meal_plans WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(MealPlan::from).ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<MealPlan>, StoreError> {
        let rows = sqlx::query_as::<_, MealPlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM meal_plans ORDER BY created_at, id"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(MealPlan::from).collect())
    }

    async fn create(&self, plan: NewMealPlan) -> Result<MealPlan, StoreError> {
        let r = plan.into_row(Uuid::new_v4(), OffsetDateTime::now_utc());
        let row = sqlx::query_as::<_, MealPlanRow>(&format!(
            r#"
            INSERT INTO meal_plans (id, user_id, monday, tuesday, wednesday, thursday,
                                    friday, saturday, sunday, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(r.id)
        .bind(r.user_id)
        .bind(r.monday)
        .bind(r.tuesday)
        .bind(r.wednesday)
        .bind(r.thursday)
        .bind(r.friday)
        .bind(r.saturday)
        .bind(r.sunday)
        .bind(r.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "meal plan already exists for this user"))?;
        Ok(MealPlan::from(row))
    }

    async fn update(&self, id: &str, patch: MealPlanPatch) -> Result<MealPlan, StoreError> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        let id = parse_id(id, "meal plan id")?;
        let row = sqlx::query_as::<_, MealPlanRow>(&format!(
            r#"
            UPDATE meal_plans SET
                monday     = COALESCE($2, monday),
                tuesday    = COALESCE($3, tuesday),
                wednesday  = COALESCE($4, wednesday),
                thursday   = COALESCE($5, thursday),
                friday     = COALESCE($6, friday),
                saturday   = COALESCE($7, saturday),
                sunday     = COALESCE($8, sunday),
                updated_at = now()
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.monday.map(Json))
        .bind(patch.tuesday.map(Json))
        .bind(patch.wednesday.map(Json))
        .bind(patch.thursday.map(Json))
        .bind(patch.friday.map(Json))
        .bind(patch.saturday.map(Json))
        .bind(patch.sunday.map(Json))
        .fetch_optional(&self.db)
        .await?;
        row.map(MealPlan::from).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id, "meal plan id")?;
        let res = sqlx::query("DELETE FROM meal_plans WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
