use crate::contract::model::User;
use crate::infra::storage::entity::Model as UserEntity;

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        User {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            given_name: entity.given_name,
            family_name: entity.family_name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
