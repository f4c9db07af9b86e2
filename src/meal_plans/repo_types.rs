use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// One meal inside a day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    #[serde(default)]
    pub time: String, // free text, e.g. "08:00 AM"
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub proteins: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
}

/// Row as stored in `meal_plans`; each day bucket is a JSONB array.
#[derive(Debug, Clone, FromRow)]
pub struct MealPlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub monday: Json<Vec<MealEntry>>,
    pub tuesday: Json<Vec<MealEntry>>,
    pub wednesday: Json<Vec<MealEntry>>,
    pub thursday: Json<Vec<MealEntry>>,
    pub friday: Json<Vec<MealEntry>>,
    pub saturday: Json<Vec<MealEntry>>,
    pub sunday: Json<Vec<MealEntry>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub monday: Vec<MealEntry>,
    pub tuesday: Vec<MealEntry>,
    pub wednesday: Vec<MealEntry>,
    pub thursday: Vec<MealEntry>,
    pub friday: Vec<MealEntry>,
    pub saturday: Vec<MealEntry>,
    pub sunday: Vec<MealEntry>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<MealPlanRow> for MealPlan {
    fn from(r: MealPlanRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            monday: r.monday.0,
            tuesday: r.tuesday.0,
            wednesday: r.wednesday.0,
            thursday: r.thursday.0,
            friday: r.friday.0,
            saturday: r.saturday.0,
            sunday: r.sunday.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// A plan to insert; the id is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewMealPlan {
    pub user_id: Uuid,
    pub monday: Vec<MealEntry>,
    pub tuesday: Vec<MealEntry>,
    pub wednesday: Vec<MealEntry>,
    pub thursday: Vec<MealEntry>,
    pub friday: Vec<MealEntry>,
    pub saturday: Vec<MealEntry>,
    pub sunday: Vec<MealEntry>,
}

impl NewMealPlan {
    pub fn into_row(self, id: Uuid, now: OffsetDateTime) -> MealPlanRow {
        MealPlanRow {
            id,
            user_id: self.user_id,
            monday: Json(self.monday),
            tuesday: Json(self.tuesday),
            wednesday: Json(self.wednesday),
            thursday: Json(self.thursday),
            friday: Json(self.friday),
            saturday: Json(self.saturday),
            sunday: Json(self.sunday),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Day buckets to replace. A present bucket (even empty) overwrites the stored one.
#[derive(Debug, Clone, Default)]
pub struct MealPlanPatch {
    pub monday: Option<Vec<MealEntry>>,
    pub tuesday: Option<Vec<MealEntry>>,
    pub wednesday: Option<Vec<MealEntry>>,
    pub thursday: Option<Vec<MealEntry>>,
    pub friday: Option<Vec<MealEntry>>,
    pub saturday: Option<Vec<MealEntry>>,
    pub sunday: Option<Vec<MealEntry>>,
}

impl MealPlanPatch {
    pub fn is_empty(&self) -> bool {
        self.monday.is_none()
            && self.tuesday.is_none()
            && self.wednesday.is_none()
            && self.thursday.is_none()
            && self.friday.is_none()
            && self.saturday.is_none()
            && self.sunday.is_none()
    }

    #[cfg(test)]
    pub fn apply_to(self, plan: &mut MealPlan) {
        let days = [
            (&mut plan.monday, self.monday),
            (&mut plan.tuesday, self.tuesday),
            (&mut plan.wednesday, self.wednesday),
            (&mut plan.thursday, self.thursday),
            (&mut plan.friday, self.friday),
            (&mut plan.saturday, self.saturday),
            (&mut plan.sunday, self.sunday),
        ];
        for (slot, bucket) in days {
            if let Some(bucket) = bucket {
                *slot = bucket;
            }
        }
    }
}
