use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::commands::{CreateChoreCommand, UpdateChoreCommand};
use crate::domain::models::chore::{Chore, ChoreValidationError, NewChore, MAX_DESCRIPTION_LEN};
use crate::storage::{ChoreStorage, Connection};

/// Service for the reusable chore catalogue
#[derive(Clone)]
pub struct ChoreService<C: Connection> {
    chore_repository: C::ChoreRepository,
}

impl<C: Connection> ChoreService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            chore_repository: connection.create_chore_repository(),
        }
    }

    pub async fn create_chore(&self, command: CreateChoreCommand) -> Result<Chore> {
        let description = Self::validate_description(&command.description)?;
        info!("Creating chore: {} ({})", description, command.frequency);

        let chore = self
            .chore_repository
            .insert_chore(&NewChore {
                description,
                frequency: command.frequency,
                created_at: Utc::now(),
            })
            .await?;

        info!("Created chore with ID: {}", chore.id);
        Ok(chore)
    }

    pub async fn get_chore(&self, chore_id: i64) -> Result<Chore> {
        match self.chore_repository.get_chore(chore_id).await? {
            Some(chore) => Ok(chore),
            None => {
                warn!("Chore not found: {}", chore_id);
                Err(ChoreValidationError::NotFound(chore_id).into())
            }
        }
    }

    /// Chores, most recently created first
    pub async fn list_chores(&self, limit: Option<u32>) -> Result<Vec<Chore>> {
        self.chore_repository.list_chores(limit).await
    }

    pub async fn chores_by_id(&self) -> Result<HashMap<i64, Chore>> {
        let chores = self.chore_repository.list_chores(None).await?;
        Ok(chores.into_iter().map(|chore| (chore.id, chore)).collect())
    }

    pub async fn update_chore(&self, command: UpdateChoreCommand) -> Result<Chore> {
        info!("Updating chore: {}", command.chore_id);

        let current = self.get_chore(command.chore_id).await?;
        let description = match command.description {
            Some(description) => Self::validate_description(&description)?,
            None => current.description.clone(),
        };

        let updated = Chore {
            description,
            frequency: command.frequency.unwrap_or(current.frequency),
            ..current
        };

        if !self.chore_repository.update_chore(&updated).await? {
            return Err(ChoreValidationError::NotFound(updated.id).into());
        }
        Ok(updated)
    }

    /// Delete a chore together with all of its assignments
    pub async fn delete_chore(&self, chore_id: i64) -> Result<()> {
        info!("Deleting chore: {}", chore_id);

        if !self.chore_repository.delete_chore(chore_id).await? {
            return Err(ChoreValidationError::NotFound(chore_id).into());
        }
        Ok(())
    }

    fn validate_description(description: &str) -> Result<String, ChoreValidationError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(ChoreValidationError::EmptyDescription);
        }
        if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ChoreValidationError::DescriptionTooLong);
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;
    use shared::ChoreFrequency;

    async fn setup_test() -> ChoreService<DbConnection> {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        ChoreService::new(&db)
    }

    fn create(description: &str, frequency: ChoreFrequency) -> CreateChoreCommand {
        CreateChoreCommand {
            description: description.to_string(),
            frequency,
        }
    }

    #[tokio::test]
    async fn test_create_chore_trims_description() {
        let service = setup_test().await;
        let chore = service
            .create_chore(create("  Take out trash  ", ChoreFrequency::Weekly))
            .await
            .unwrap();
        assert_eq!(chore.description, "Take out trash");
        assert_eq!(service.get_chore(chore.id).await.unwrap(), chore);
    }

    #[tokio::test]
    async fn test_create_chore_validation() {
        let service = setup_test().await;

        let err = service.create_chore(create("   ", ChoreFrequency::OneTime)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChoreValidationError>(),
            Some(ChoreValidationError::EmptyDescription)
        ));
        assert_eq!(err.to_string(), "Please enter a chore description");

        let err = service
            .create_chore(create(&"a".repeat(257), ChoreFrequency::OneTime))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChoreValidationError>(),
            Some(ChoreValidationError::DescriptionTooLong)
        ));
        assert!(service.list_chores(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let service = setup_test().await;
        let chore = service.create_chore(create("Dishes", ChoreFrequency::Daily)).await.unwrap();

        let updated = service
            .update_chore(UpdateChoreCommand {
                chore_id: chore.id,
                description: None,
                frequency: Some(ChoreFrequency::Weekly),
            })
            .await
            .unwrap();
        assert_eq!(updated.description, "Dishes");
        assert_eq!(updated.frequency, ChoreFrequency::Weekly);

        let err = service
            .update_chore(UpdateChoreCommand {
                chore_id: chore.id,
                description: Some("".to_string()),
                frequency: None,
            })
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ChoreValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_delete_chore() {
        let service = setup_test().await;
        let chore = service.create_chore(create("Dishes", ChoreFrequency::Daily)).await.unwrap();

        service.delete_chore(chore.id).await.unwrap();
        let err = service.delete_chore(chore.id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChoreValidationError>(),
            Some(ChoreValidationError::NotFound(_))
        ));
        assert!(service.chores_by_id().await.unwrap().is_empty());
    }
}
