//! Upload metadata entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "uploads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub url: String,
    #[sea_orm(unique)]
    pub file_key: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Upload {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            url: model.url,
            file_key: model.file_key,
            mime_type: model.mime_type,
            size: model.size,
            created_at: model.created_at.into(),
        }
    }
}

impl From<quill_core::domain::Upload> for ActiveModel {
    fn from(upload: quill_core::domain::Upload) -> Self {
        Self {
            id: Set(upload.id),
            name: Set(upload.name),
            url: Set(upload.url),
            file_key: Set(upload.file_key),
            mime_type: Set(upload.mime_type),
            size: Set(upload.size),
            created_at: Set(upload.created_at.into()),
        }
    }
}
