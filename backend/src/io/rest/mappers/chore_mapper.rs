use shared::{Chore as SharedChore, ChoreListResponse, ChoreResponse, CreateChoreRequest, UpdateChoreRequest};

use crate::domain::commands::{CreateChoreCommand, UpdateChoreCommand};
use crate::domain::models::chore::Chore as DomainChore;

/// Mapper to convert between shared Chore DTOs and domain Chore models.
pub struct ChoreMapper;

impl ChoreMapper {
    pub fn to_dto(domain: DomainChore) -> SharedChore {
        SharedChore {
            id: domain.id,
            description: domain.description,
            frequency: domain.frequency,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_chore_response(domain: DomainChore, success_message: impl Into<String>) -> ChoreResponse {
        ChoreResponse {
            chore: Self::to_dto(domain),
            success_message: success_message.into(),
        }
    }

    pub fn to_chore_list_dto(chores: Vec<DomainChore>) -> ChoreListResponse {
        ChoreListResponse {
            chores: chores.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateChoreRequest) -> CreateChoreCommand {
        CreateChoreCommand {
            description: request.description,
            frequency: request.frequency.unwrap_or_default(),
        }
    }

    pub fn to_update_command(chore_id: i64, request: UpdateChoreRequest) -> UpdateChoreCommand {
        UpdateChoreCommand {
            chore_id,
            description: request.description,
            frequency: request.frequency,
        }
    }
}
