use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::meal_plans::repo_types::{MealEntry, MealPlan, MealPlanPatch, NewMealPlan};

/// Body of `POST /meal-plans`. Omitted days start empty.
#[derive(Debug, Deserialize)]
pub struct CreateMealPlanRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub monday: Vec<MealEntry>,
    #[serde(default)]
    pub tuesday: Vec<MealEntry>,
    #[serde(default)]
    pub wednesday: Vec<MealEntry>,
    #[serde(default)]
    pub thursday: Vec<MealEntry>,
    #[serde(default)]
    pub friday: Vec<MealEntry>,
    #[serde(default)]
    pub saturday: Vec<MealEntry>,
    #[serde(default)]
    pub sunday: Vec<MealEntry>,
}

impl From<CreateMealPlanRequest> for NewMealPlan {
    fn from(r: CreateMealPlanRequest) -> Self {
        Self {
            user_id: r.user_id,
            monday: r.monday,
            tuesday: r.tuesday,
            wednesday: r.wednesday,
            thursday: r.thursday,
            friday: r.friday,
            saturday: r.saturday,
            sunday: r.sunday,
        }
    }
}

/// Body of `PUT /meal-plans/:id`. Only the days present in the body are replaced;
/// `id` and `user_id`, if sent, are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMealPlanRequest {
    pub monday: Option<Vec<MealEntry>>,
    pub tuesday: Option<Vec<MealEntry>>,
    pub wednesday: Option<Vec<MealEntry>>,
    pub thursday: Option<Vec<MealEntry>>,
    pub friday: Option<Vec<MealEntry>>,
    pub saturday: Option<Vec<MealEntry>>,
    pub sunday: Option<Vec<MealEntry>>,
}

impl From<UpdateMealPlanRequest> for MealPlanPatch {
    fn from(r: UpdateMealPlanRequest) -> Self {
        Self {
            monday: r.monday,
            tuesday: r.tuesday,
            wednesday: r.wednesday,
            thursday: r.thursday,
            friday: r.friday,
            saturday: r.saturday,
            sunday: r.sunday,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealPlanResponse {
    pub meal: MealPlan,
}

#[derive(Debug, Serialize)]
pub struct MealPlansResponse {
    pub meals: Vec<MealPlan>,
}
