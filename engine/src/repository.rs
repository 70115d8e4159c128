//! Plan Repository - persistence seam.
//!
//! The engine never stores plans itself. Hosts provide a [`PlanRepository`];
//! [`InMemoryPlanRepository`] backs tests and embedded use.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::{Plan, PlanId};
use crate::error::RepositoryError;

/// Contract for plan storage.
///
/// This trait abstracts the persistence service, enabling:
/// - Unit testing with the in-memory implementation
/// - Swapping storage backends without changing the engine
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Loads the plan stored under `id`.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if no such plan exists, or another
    /// `RepositoryError` if storage fails.
    async fn fetch_plan(&self, id: &PlanId) -> Result<Plan, RepositoryError>;

    /// Stores `plan`, creating it when `id` is `None` and replacing it
    /// otherwise. Returns the id the plan is stored under.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` when updating an unknown plan, or
    /// another `RepositoryError` if storage fails.
    async fn save_plan(&self, id: Option<&PlanId>, plan: &Plan) -> Result<PlanId, RepositoryError>;
}

/// Plans kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPlanRepository {
    plans: Mutex<HashMap<PlanId, Plan>>,
}

impl InMemoryPlanRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.lock().len()
    }

    /// Returns true when no plan is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.lock().is_empty()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn fetch_plan(&self, id: &PlanId) -> Result<Plan, RepositoryError> {
        self.plans
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn save_plan(&self, id: Option<&PlanId>, plan: &Plan) -> Result<PlanId, RepositoryError> {
        let mut plans = self.plans.lock();
        let id = match id {
            Some(id) if plans.contains_key(id) => id.clone(),
            Some(id) => return Err(RepositoryError::NotFound(id.clone())),
            None => PlanId::generate(),
        };
        plans.insert(id.clone(), plan.clone());
        debug!(plan_id = %id, "Saved plan");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_then_update() {
        let repo = InMemoryPlanRepository::new();
        let mut plan = Plan::default();

        let id = repo.save_plan(None, &plan).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(repo.len(), 1);

        plan.general_info = json!({"name": "Block A"});
        let same = repo.save_plan(Some(&id), &plan).await.unwrap();
        assert_eq!(same, id);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.fetch_plan(&id).await.unwrap(), plan);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let repo = InMemoryPlanRepository::new();
        let missing = PlanId::new("missing");

        assert!(matches!(
            repo.fetch_plan(&missing).await,
            Err(RepositoryError::NotFound(id)) if id == missing
        ));
        assert!(matches!(
            repo.save_plan(Some(&missing), &Plan::default()).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn new_plans_get_distinct_ids() {
        let repo = InMemoryPlanRepository::new();
        let a = repo.save_plan(None, &Plan::default()).await.unwrap();
        let b = repo.save_plan(None, &Plan::default()).await.unwrap();
        assert_ne!(a, b);
    }
}
