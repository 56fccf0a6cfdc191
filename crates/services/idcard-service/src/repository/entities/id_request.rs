//! ID request database entity for SeaORM.

use std::str::FromStr;

use sea_orm::entity::prelude::*;

use domain::{DomainError, DomainResult, IdRequest, RequestStatus, RequestType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "id_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub status: String,
    pub request_type: Option<String>,
    pub photo_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    pub paid: bool,
    pub request_date: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Fails only if a stored tag is not a known status or type.
impl TryFrom<Model> for IdRequest {
    type Error = DomainError;

    fn try_from(model: Model) -> DomainResult<Self> {
        let status = RequestStatus::from_str(&model.status)
            .map_err(|_| DomainError::unknown_tag("status", model.status.as_str()))?;
        let request_type = model
            .request_type
            .as_deref()
            .map(RequestType::from_str)
            .transpose()
            .map_err(|_| {
                let value = model.request_type.clone().unwrap_or_default();
                DomainError::unknown_tag("request type", value)
            })?;

        Ok(IdRequest {
            id: model.id,
            user_id: model.user_id,
            status,
            request_type,
            photo_url: model.photo_url,
            reason: model.reason,
            comments: model.comments,
            paid: model.paid,
            request_date: model.request_date,
            updated_at: model.updated_at,
        })
    }
}
