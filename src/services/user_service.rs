use crate::database::DbConn;
use crate::entities::user_entity;
use crate::error::AppResult;
use sea_orm::EntityTrait;
use uuid::Uuid;

/// Thin wrapper over the user directory. Account management lives outside
/// this service; the commerce core only needs existence and the country
/// reference.
#[derive(Clone)]
pub struct UserService {
    db: DbConn,
}

impl UserService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<user_entity::Model>> {
        let user = user_entity::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(user)
    }
}
