use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
///
/// Paths are collected from the routers in [`crate::routes`].
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness checks"),
        (name = "Authentication", description = "Account registration and token identity"),
        (name = "Courses", description = "Course and prerequisite management"),
        (name = "Graph", description = "Prerequisite graph for visualization"),
        (name = "Import/Export", description = "CSV import and export"),
    ),
    info(
        title = "Course Prerequisite API",
        version = "1.0.0",
        description = "Track courses and the prerequisites between them",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
