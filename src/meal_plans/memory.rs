use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{parse_id, StoreError};
use crate::meal_plans::repo::MealPlanStore;
use crate::meal_plans::repo_types::{MealPlan, MealPlanPatch, NewMealPlan};

/// In-process `MealPlanStore` for tests; one plan per user is enforced under the insert lock.
#[derive(Default)]
pub struct MemoryMealPlanStore {
    plans: Mutex<Vec<MealPlan>>,
}

impl MemoryMealPlanStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MealPlan>> {
        self.plans.lock().expect("meal plan store mutex poisoned")
    }
}

#[async_trait]
impl MealPlanStore for MemoryMealPlanStore {
    async fn get(&self, id: &str) -> Result<MealPlan, StoreError> {
        let id = parse_id(id, "meal plan id")?;
        self.lock()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_user_id(&self, user_id: &str) -> Result<MealPlan, StoreError> {
        let user_id = parse_id(user_id, "user id")?;
        self.lock()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<MealPlan>, StoreError> {
        Ok(self.lock().clone())
    }

    async fn create(&self, plan: NewMealPlan) -> Result<MealPlan, StoreError> {
        let mut plans = self.lock();
        if plans.iter().any(|p| p.user_id == plan.user_id) {
            return Err(StoreError::Conflict(
                "meal plan already exists for this user".into(),
            ));
        }
        let created = MealPlan::from(plan.into_row(Uuid::new_v4(), OffsetDateTime::now_utc()));
        plans.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, patch: MealPlanPatch) -> Result<MealPlan, StoreError> {
        let id = parse_id(id, "meal plan id")?;
        let mut plans = self.lock();
        let plan = plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        if !patch.is_empty() {
            patch.apply_to(plan);
            plan.updated_at = OffsetDateTime::now_utc();
        }
        Ok(plan.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id, "meal plan id")?;
        let mut plans = self.lock();
        let before = plans.len();
        plans.retain(|p| p.id != id);
        if plans.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::meal_plans::repo_types::MealEntry;

    fn meal(time: &str, name: &str) -> MealEntry {
        MealEntry {
            time: time.into(),
            name: name.into(),
            proteins: 10.0,
            carbs: 10.0,
            fats: 5.0,
        }
    }

    fn full_week(user_id: Uuid) -> NewMealPlan {
        NewMealPlan {
            user_id,
            monday: vec![meal("08:00", "Oats"), meal("12:30", "Wrap"), meal("19:00", "Soup")],
            tuesday: vec![meal("08:00", "Toast")],
            wednesday: vec![],
            thursday: vec![meal("13:00", "Rice"), meal("09:00", "Yogurt")],
            friday: vec![meal("18:00", "Fish")],
            saturday: vec![meal("11:00", "Brunch")],
            sunday: vec![meal("20:00", "Pasta")],
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_buckets_in_submitted_order() {
        let store = MemoryMealPlanStore::default();
        let submitted = full_week(Uuid::new_v4());
        let created = store.create(submitted.clone()).await.unwrap();
        let fetched = store.get(&created.id.to_string()).await.unwrap();

        assert_eq!(fetched.monday, submitted.monday);
        assert_eq!(fetched.tuesday, submitted.tuesday);
        assert_eq!(fetched.wednesday, submitted.wednesday);
        assert_eq!(fetched.thursday, submitted.thursday);
        assert_eq!(fetched.friday, submitted.friday);
        assert_eq!(fetched.saturday, submitted.saturday);
        assert_eq!(fetched.sunday, submitted.sunday);
        assert_eq!(fetched.thursday[0].name, "Rice");
    }

    #[tokio::test]
    async fn get_by_user_id_finds_the_plan() {
        let store = MemoryMealPlanStore::default();
        let user_id = Uuid::new_v4();
        let created = store.create(full_week(user_id)).await.unwrap();
        let fetched = store.get_by_user_id(&user_id.to_string()).await.unwrap();
        assert_eq!(fetched.id, created.id);

        let other = store.get_by_user_id(&Uuid::new_v4().to_string()).await;
        assert!(matches!(other, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn concurrent_creates_for_one_user_yield_one_conflict() {
        let store = Arc::new(MemoryMealPlanStore::default());
        let user_id = Uuid::new_v4();

        let a = tokio::spawn({
            let store = store.clone();
            async move { store.create(full_week(user_id)).await }
        });
        let b = tokio::spawn({
            let store = store.clone();
            async move { store.create(full_week(user_id)).await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::Conflict(_))))
            .count();
        assert_eq!((ok, conflicts), (1, 1));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_replaces_present_buckets_and_keeps_others() {
        let store = MemoryMealPlanStore::default();
        let created = store.create(full_week(Uuid::new_v4())).await.unwrap();
        let id = created.id.to_string();

        let patch = MealPlanPatch {
            monday: Some(vec![meal("07:00", "Porridge")]),
            sunday: Some(vec![]),
            ..Default::default()
        };
        let updated = store.update(&id, patch).await.unwrap();
        assert_eq!(updated.monday, vec![meal("07:00", "Porridge")]);
        assert!(updated.sunday.is_empty());
        assert_eq!(updated.tuesday, created.tuesday);
        assert_eq!(store.get(&id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn malformed_ids_are_invalid_argument_never_not_found() {
        let store = MemoryMealPlanStore::default();
        assert!(matches!(store.get("xyz").await, Err(StoreError::InvalidArgument(_))));
        assert!(matches!(
            store.update("xyz", MealPlanPatch::default()).await,
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(store.delete("xyz").await, Err(StoreError::InvalidArgument(_))));
        assert!(matches!(
            store.get_by_user_id("xyz").await,
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_plan() {
        let store = MemoryMealPlanStore::default();
        let created = store.create(full_week(Uuid::new_v4())).await.unwrap();
        let id = created.id.to_string();
        store.delete(&id).await.unwrap();
        assert!(matches!(store.get(&id).await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete(&id).await, Err(StoreError::NotFound)));
    }
}
