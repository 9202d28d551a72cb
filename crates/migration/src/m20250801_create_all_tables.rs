use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create owners table
        manager
            .create_table(
                Table::create()
                    .table(Owners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Owners::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Owners::Username).string().not_null())
                    .col(ColumnDef::new(Owners::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Courses::CourseCode).string().not_null())
                    .col(ColumnDef::new(Courses::CourseName).string().not_null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .col(ColumnDef::new(Courses::Department).string().not_null())
                    .col(
                        ColumnDef::new(Courses::SourceType)
                            .string_len(16)
                            .not_null()
                            .default("added"),
                    )
                    .col(ColumnDef::new(Courses::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-owner_id")
                            .from(Courses::Table, Courses::OwnerId)
                            .to(Owners::Table, Owners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_dependencies table (prerequisite -> dependent edges)
        manager
            .create_table(
                Table::create()
                    .table(CourseDependencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseDependencies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseDependencies::CourseId).uuid().not_null())
                    .col(
                        ColumnDef::new(CourseDependencies::PrerequisiteId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseDependencies::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_dependencies-course_id")
                            .from(CourseDependencies::Table, CourseDependencies::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_dependencies-prerequisite_id")
                            .from(
                                CourseDependencies::Table,
                                CourseDependencies::PrerequisiteId,
                            )
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(CourseDependencies::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Owners::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Owners {
    Table,
    Id,
    Username,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum Courses {
    Table,
    Id,
    OwnerId,
    CourseCode,
    CourseName,
    Credits,
    Department,
    SourceType,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum CourseDependencies {
    Table,
    Id,
    CourseId,
    PrerequisiteId,
    CreatedAt,
}
