//! Traveller plans and the admin account listings.
//!
//! Hotels are listed through [`Catalog`](super::Catalog).

use super::WorkflowResult;
use std::sync::Arc;
use voyage_core::ids::UserId;
use voyage_core::model::{CarProvider, User};
use voyage_core::store::CredentialStore;

/// Account reads and the traveller's plan.
#[derive(Clone)]
pub struct AccountDirectory {
    accounts: Arc<dyn CredentialStore>,
}

impl AccountDirectory {
    /// Create the directory.
    #[must_use]
    pub fn new(accounts: Arc<dyn CredentialStore>) -> Self {
        Self { accounts }
    }

    /// Replace the traveller's saved plan.
    ///
    /// # Errors
    ///
    /// `NotFound` when the user was deleted meanwhile.
    #[tracing::instrument(skip_all, fields(user_id = %user_id))]
    pub async fn set_plan(&self, user_id: UserId, plan: serde_json::Value) -> WorkflowResult<User> {
        let user = self.accounts.set_user_plan(user_id, plan).await?;
        tracing::info!("Plan updated");
        Ok(user)
    }

    /// Every traveller.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn users(&self) -> WorkflowResult<Vec<User>> {
        Ok(self.accounts.list_users().await?)
    }

    /// Every car provider.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn car_providers(&self) -> WorkflowResult<Vec<CarProvider>> {
        Ok(self.accounts.list_car_providers().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::workflow::WorkflowError;
    use voyage_core::store::StoreError;
    use voyage_testing::{InMemoryStore, fixtures};

    #[tokio::test]
    async fn plan_is_replaced_wholesale() {
        let store = Arc::new(InMemoryStore::new());
        let directory = AccountDirectory::new(store.clone());
        let user = store
            .create_user(fixtures::new_user("alice@example.com"))
            .await
            .unwrap();

        directory
            .set_plan(user.id, serde_json::json!({"days": 3, "city": "Porto"}))
            .await
            .unwrap();
        let updated = directory
            .set_plan(user.id, serde_json::json!(["Lisbon"]))
            .await
            .unwrap();
        assert_eq!(updated.plan, Some(serde_json::json!(["Lisbon"])));

        let err = directory
            .set_plan(UserId::new(), serde_json::Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Store(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn listings_cover_each_kind() {
        let store = Arc::new(InMemoryStore::new());
        let directory = AccountDirectory::new(store.clone());
        store
            .create_user(fixtures::new_user("alice@example.com"))
            .await
            .unwrap();
        store
            .create_car_provider(fixtures::new_car_provider("fleet@example.com"))
            .await
            .unwrap();

        assert_eq!(directory.users().await.unwrap().len(), 1);
        assert_eq!(
            directory.car_providers().await.unwrap()[0].email,
            "fleet@example.com"
        );
    }
}
