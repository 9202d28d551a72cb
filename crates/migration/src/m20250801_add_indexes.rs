use crate::m20250801_create_all_tables::{CourseDependencies, Courses, Owners};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_owners_username")
                    .table(Owners::Table)
                    .col(Owners::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Course codes are unique per owner, not globally
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_owner_id_course_code")
                    .table(Courses::Table)
                    .col(Courses::OwnerId)
                    .col(Courses::CourseCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listings are ordered newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_created_at")
                    .table(Courses::Table)
                    .col(Courses::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_dependencies_pair")
                    .table(CourseDependencies::Table)
                    .col(CourseDependencies::CourseId)
                    .col(CourseDependencies::PrerequisiteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Reverse lookup for deletes that clear incoming edges
        manager
            .create_index(
                Index::create()
                    .name("idx_course_dependencies_prerequisite_id")
                    .table(CourseDependencies::Table)
                    .col(CourseDependencies::PrerequisiteId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        for name in [
            "idx_course_dependencies_prerequisite_id",
            "idx_course_dependencies_pair",
            "idx_courses_created_at",
            "idx_courses_owner_id_course_code",
            "idx_owners_username",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
