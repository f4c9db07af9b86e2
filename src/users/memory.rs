use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{parse_id, StoreError};
use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, User, UserPatch};

/// In-process `UserStore` used by tests. Email uniqueness is checked under the same lock as the insert.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<User>> {
        self.users.lock().expect("user store mutex poisoned")
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.lock()
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        let id = parse_id(id, "user id")?;
        self.lock()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock().clone())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.lock();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("user already exists".into()));
        }
        let created = User::from(user.into_row(Uuid::new_v4(), OffsetDateTime::now_utc()));
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, email: &str, patch: UserPatch) -> Result<User, StoreError> {
        let mut users = self.lock();
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or(StoreError::NotFound)?;
        if !patch.is_empty() {
            patch.apply_to(user);
            user.updated_at = OffsetDateTime::now_utc();
        }
        Ok(user.clone())
    }

    async fn delete(&self, email: &str) -> Result<(), StoreError> {
        let mut users = self.lock();
        let before = users.len();
        users.retain(|u| u.email != email);
        if users.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::password::hash_password;

    fn new_user(email: &str, name: &str) -> NewUser {
        NewUser {
            email: email.into(),
            name: name.into(),
            last_name: String::new(),
            password_hash: hash_password("pw").unwrap(),
            height: 180.0,
            weight: 80.0,
            age: 40,
            gender: "male".into(),
            goal: "cut".into(),
            activity_factor: "1.2".into(),
            goal_macro_proteins: 150.0,
            goal_macro_carbs: 180.0,
            goal_macro_fats: 55.0,
            notes: "early riser".into(),
        }
    }

    #[tokio::test]
    async fn create_then_get_by_email_returns_same_fields() {
        let store = MemoryUserStore::default();
        let created = store.create(new_user("a@x.com", "Ann")).await.unwrap();
        let fetched = store.get_by_email("a@x.com").await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.name, "Ann");
        assert_eq!(fetched.goal_macro_proteins, 150.0);
        assert_eq!(store.get_by_id(&created.id.to_string()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryUserStore::default();
        store.create(new_user("a@x.com", "Ann")).await.unwrap();
        let err = store.create(new_user("a@x.com", "Other")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_patch_leaves_user_unchanged() {
        let store = MemoryUserStore::default();
        let created = store.create(new_user("a@x.com", "Ann")).await.unwrap();
        let updated = store.update("a@x.com", UserPatch::default()).await.unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn name_only_patch_changes_only_name() {
        let store = MemoryUserStore::default();
        let created = store.create(new_user("a@x.com", "Ann")).await.unwrap();
        let patch = UserPatch {
            name: Some("Anna".into()),
            ..Default::default()
        };
        let updated = store.update("a@x.com", patch).await.unwrap();
        assert_eq!(updated.name, "Anna");
        assert_eq!(
            User {
                name: created.name.clone(),
                updated_at: created.updated_at,
                ..updated
            },
            created
        );
    }

    #[tokio::test]
    async fn update_unknown_email_is_not_found() {
        let store = MemoryUserStore::default();
        let err = store.update("ghost@x.com", UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = MemoryUserStore::default();
        store.create(new_user("a@x.com", "Ann")).await.unwrap();
        store.delete("a@x.com").await.unwrap();
        assert!(matches!(store.get_by_email("a@x.com").await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete("a@x.com").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn password_lookup_treats_mismatch_as_not_found() {
        let store = MemoryUserStore::default();
        store.create(new_user("a@x.com", "Ann")).await.unwrap();
        assert!(store.get("a@x.com", "pw").await.is_ok());
        assert!(matches!(store.get("a@x.com", "nope").await, Err(StoreError::NotFound)));
        assert!(matches!(store.get("b@x.com", "pw").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn malformed_id_is_invalid_argument() {
        let store = MemoryUserStore::default();
        let err = store.get_by_id("not-an-id").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }
}
