use models::{
    course::{Course, PrerequisiteRef},
    department::Department,
    source_type::SourceType,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub course_code: String, // unique per owner
    pub course_name: String,
    pub credits: i32,
    pub department: Department,
    pub source_type: SourceType,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::owner::Entity",
        from = "Column::OwnerId",
        to = "super::owner::Column::Id"
    )]
    Owner,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Reference used when this course appears on the prerequisite side of an edge
    pub fn as_prerequisite(&self) -> PrerequisiteRef {
        PrerequisiteRef {
            id: self.id,
            owner_id: self.owner_id,
            code: self.course_code.clone(),
            name: self.course_name.clone(),
        }
    }

    /// Fails with `DbErr::Type` when the stored credits are not a valid count
    pub fn into_course(self, prerequisites: Vec<PrerequisiteRef>) -> Result<Course, DbErr> {
        let credits = u32::try_from(self.credits).map_err(|_| {
            DbErr::Type(format!(
                "Course {} has invalid stored credits {}",
                self.id, self.credits
            ))
        })?;

        Ok(Course {
            id: self.id,
            owner_id: self.owner_id,
            code: self.course_code,
            name: self.course_name,
            credits,
            department: self.department,
            source_type: self.source_type,
            created_at: self.created_at,
            prerequisites,
        })
    }
}
