use shared::{CreateKidRequest, Kid as SharedKid, KidListResponse, KidResponse};

use crate::domain::commands::CreateKidCommand;
use crate::domain::models::kid::Kid as DomainKid;

/// Mapper to convert between shared Kid DTOs and domain Kid models.
pub struct KidMapper;

impl KidMapper {
    pub fn to_dto(domain: DomainKid) -> SharedKid {
        SharedKid {
            id: domain.id,
            first_name: domain.first_name,
            last_name: domain.last_name,
            points: domain.points,
            avatar_url: domain.avatar_url,
            color: domain.color,
            phone: domain.phone,
        }
    }

    pub fn to_kid_response(domain: DomainKid, success_message: impl Into<String>) -> KidResponse {
        KidResponse {
            kid: Self::to_dto(domain),
            success_message: success_message.into(),
        }
    }

    pub fn to_kid_list_dto(kids: Vec<DomainKid>) -> KidListResponse {
        KidListResponse {
            kids: kids.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateKidRequest) -> CreateKidCommand {
        CreateKidCommand {
            first_name: request.first_name,
            last_name: request.last_name,
            avatar_url: request.avatar_url,
            phone: request.phone,
        }
    }
}
