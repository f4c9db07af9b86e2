use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::{
    error::{body, required, ApiError},
    meal_plans::dto::{
        CreateMealPlanRequest, MealPlanResponse, MealPlansResponse, UpdateMealPlanRequest,
    },
    state::AppState,
};

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans", get(list_meal_plans).post(create_meal_plan))
        .route("/meal-plans/by-user/:user_id", get(get_meal_plan_by_user))
        .route(
            "/meal-plans/:id",
            get(get_meal_plan)
                .put(update_meal_plan)
                .delete(delete_meal_plan),
        )
}

fn store_err(e: crate::db::StoreError) -> ApiError {
    ApiError::from_store(e, "meal plan")
}

#[instrument(skip(state))]
pub async fn list_meal_plans(
    State(state): State<AppState>,
) -> Result<Json<MealPlansResponse>, ApiError> {
    let meals = state.meal_plans.list().await.map_err(|e| {
        error!(error = %e, "list meal plans failed");
        store_err(e)
    })?;
    Ok(Json(MealPlansResponse { meals }))
}

#[instrument(skip(state))]
pub async fn get_meal_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let id = required(id, "id")?;
    let meal = state.meal_plans.get(&id).await.map_err(store_err)?;
    Ok(Json(MealPlanResponse { meal }))
}

#[instrument(skip(state))]
pub async fn get_meal_plan_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let user_id = required(user_id, "user_id")?;
    let meal = state
        .meal_plans
        .get_by_user_id(&user_id)
        .await
        .map_err(store_err)?;
    Ok(Json(MealPlanResponse { meal }))
}

#[instrument(skip(state, payload))]
pub async fn create_meal_plan(
    State(state): State<AppState>,
    payload: Result<Json<CreateMealPlanRequest>, JsonRejection>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let req = body(payload)?;

    let meal = match state.meal_plans.create(req.into()).await {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "create meal plan failed");
            return Err(store_err(e));
        }
    };

    info!(plan_id = %meal.id, user_id = %meal.user_id, "meal plan created");
    Ok(Json(MealPlanResponse { meal }))
}

#[instrument(skip(state, payload))]
pub async fn update_meal_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateMealPlanRequest>, JsonRejection>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let id = required(id, "id")?;
    let req = body(payload)?;

    let meal = state
        .meal_plans
        .update(&id, req.into())
        .await
        .map_err(store_err)?;

    info!(plan_id = %meal.id, "meal plan updated");
    Ok(Json(MealPlanResponse { meal }))
}

#[instrument(skip(state))]
pub async fn delete_meal_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = required(id, "id")?;
    state.meal_plans.delete(&id).await.map_err(store_err)?;
    info!(plan_id = %id, "meal plan deleted");
    Ok(Json(json!({})))
}
