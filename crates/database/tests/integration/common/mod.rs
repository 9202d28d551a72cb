use database::services::{course::CourseService, identity::IdentityService};
use migration::{Migrator, MigratorTrait};
use models::{
    course::{Course, CourseDraft},
    department::Department,
    source_type::SourceType,
    visibility::Viewer,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub const SYSTEM_USERNAME: &str = "system";

/// Fresh in-memory database, migrated, with the system owner provisioned
pub struct TestDb {
    pub db: DatabaseConnection,
    pub system: Viewer,
}

impl TestDb {
    pub async fn spawn() -> Self {
        // A single connection keeps every query on the same in-memory database
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("Failed to open in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let system_id = IdentityService::provision_system_owner(&db, SYSTEM_USERNAME)
            .await
            .expect("Failed to provision system owner");

        Self {
            db,
            system: Viewer::new(system_id, system_id),
        }
    }

    /// Registers a user and returns the viewer for their requests
    pub async fn register(&self, username: &str) -> Viewer {
        IdentityService::register_owner(&self.db, username)
            .await
            .expect("Failed to register owner");
        IdentityService::resolve_viewer(&self.db, username, SYSTEM_USERNAME)
            .await
            .expect("Failed to resolve viewer")
    }

    pub async fn add(&self, viewer: &Viewer, code: &str, prerequisites: &[&str]) -> Course {
        CourseService::add_course(
            &self.db,
            viewer,
            &draft(code, prerequisites),
            SourceType::Added,
        )
        .await
        .expect("Failed to add course")
    }
}

/// Draft named after its code, worth 3 credits in Informatics
pub fn draft(code: &str, prerequisites: &[&str]) -> CourseDraft {
    draft_with(code, &format!("{code} name"), Department::Informatics, prerequisites)
}

pub fn draft_with(
    code: &str,
    name: &str,
    department: Department,
    prerequisites: &[&str],
) -> CourseDraft {
    CourseDraft::new(
        code,
        name,
        3,
        department,
        prerequisites.iter().map(|p| (*p).to_owned()),
    )
    .expect("valid draft")
}

pub fn codes(courses: &[Course]) -> Vec<&str> {
    let mut codes: Vec<&str> = courses.iter().map(|c| c.code.as_str()).collect();
    codes.sort();
    codes
}
