use std::collections::HashMap;

use anyhow::Result;
use shared::KID_COLOR_PALETTE;
use tracing::{info, warn};

use crate::domain::commands::CreateKidCommand;
use crate::domain::models::kid::{Kid, KidError, NewKid};
use crate::storage::{Connection, KidStorage};

const MAX_NAME_LEN: usize = 100;

/// Service for managing kids on the board
#[derive(Clone)]
pub struct KidService<C: Connection> {
    kid_repository: C::KidRepository,
}

impl<C: Connection> KidService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            kid_repository: connection.create_kid_repository(),
        }
    }

    /// Create a kid, handing out the next palette color in creation order
    pub async fn create_kid(&self, command: CreateKidCommand) -> Result<Kid> {
        info!("Creating kid: {} {}", command.first_name, command.last_name);

        let first_name = command.first_name.trim().to_string();
        let last_name = command.last_name.trim().to_string();
        if first_name.is_empty() {
            return Err(KidError::EmptyFirstName.into());
        }
        if first_name.chars().count() > MAX_NAME_LEN || last_name.chars().count() > MAX_NAME_LEN {
            return Err(KidError::NameTooLong.into());
        }

        let existing = self.kid_repository.count_kids().await?;
        let color = KID_COLOR_PALETTE[existing.unsigned_abs() as usize % KID_COLOR_PALETTE.len()];

        let kid = self
            .kid_repository
            .insert_kid(&NewKid {
                first_name,
                last_name,
                avatar_url: non_blank(command.avatar_url),
                color: color.to_string(),
                phone: non_blank(command.phone),
            })
            .await?;

        info!("Created kid {} with color {}", kid.id, kid.color);
        Ok(kid)
    }

    pub async fn get_kid(&self, kid_id: i64) -> Result<Kid> {
        match self.kid_repository.get_kid(kid_id).await? {
            Some(kid) => Ok(kid),
            None => {
                warn!("Kid not found: {}", kid_id);
                Err(KidError::NotFound(kid_id).into())
            }
        }
    }

    pub async fn list_kids(&self) -> Result<Vec<Kid>> {
        self.kid_repository.list_kids().await
    }

    pub async fn count_kids(&self) -> Result<i64> {
        self.kid_repository.count_kids().await
    }

    /// Kids keyed by id, as reference data for aggregation
    pub async fn kids_by_id(&self) -> Result<HashMap<i64, Kid>> {
        let kids = self.kid_repository.list_kids().await?;
        Ok(kids.into_iter().map(|kid| (kid.id, kid)).collect())
    }

    /// Set the avatar URL; None or a blank string clears it
    pub async fn update_avatar(&self, kid_id: i64, avatar_url: Option<String>) -> Result<Kid> {
        let avatar_url = non_blank(avatar_url);
        info!("Updating avatar for kid {}: {:?}", kid_id, avatar_url);

        if !self.kid_repository.update_avatar(kid_id, avatar_url.as_deref()).await? {
            return Err(KidError::NotFound(kid_id).into());
        }
        self.get_kid(kid_id).await
    }

    pub async fn award_points(&self, kid_id: i64, points: i64) -> Result<Kid> {
        if points == 0 {
            return Err(KidError::ZeroPoints.into());
        }
        info!("Awarding {} points to kid {}", points, kid_id);

        self.kid_repository
            .add_points(kid_id, points)
            .await?
            .ok_or_else(|| KidError::NotFound(kid_id).into())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
