use database::{
    error::ServiceError,
    services::{course::CourseService, query_course::QueryCourseService},
};
use models::{department::Department, source_type::SourceType};

use crate::common::{TestDb, draft, draft_with};

mod add {
    use super::*;

    #[tokio::test]
    async fn course_with_prerequisite_is_linked() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let cs101 = app.add(&alice, "CS101", &[]).await;
        let cs201 = app.add(&alice, "CS201", &["CS101"]).await;

        assert_eq!(cs201.owner_id, alice.acting_owner);
        assert_eq!(cs201.source_type, SourceType::Added);
        assert_eq!(cs201.prerequisites.len(), 1);
        assert_eq!(cs201.prerequisites[0].id, cs101.id);
        assert_eq!(cs201.prerequisites[0].code, "CS101");
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected_per_owner_only() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;

        app.add(&alice, "CS101", &[]).await;

        let err = CourseService::add_course(&app.db, &alice, &draft("CS101", &[]), SourceType::Added)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateCourseCode(ref code) if code == "CS101"));

        // Another owner may reuse the code
        let bobs = app.add(&bob, "CS101", &[]).await;
        assert_eq!(bobs.owner_id, bob.acting_owner);
    }

    #[tokio::test]
    async fn self_reference_is_dropped() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let course = app.add(&alice, "CS101", &["CS101"]).await;
        assert!(course.prerequisites.is_empty());
    }

    #[tokio::test]
    async fn unknown_prerequisite_rolls_back_the_course() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let err = CourseService::add_course(
            &app.db,
            &alice,
            &draft("CS201", &["CS101"]),
            SourceType::Added,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::PrerequisiteNotFound(ref code) if code == "CS101"));

        let stored = QueryCourseService::get_course(&app.db, alice.acting_owner, "CS201")
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn other_users_courses_cannot_be_prerequisites() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;

        app.add(&alice, "CS101", &[]).await;

        let err = CourseService::add_course(
            &app.db,
            &bob,
            &draft("CS201", &["CS101"]),
            SourceType::Added,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::PrerequisiteNotFound(_)));
    }

    #[tokio::test]
    async fn system_course_can_be_a_prerequisite() {
        let app = TestDb::spawn().await;
        let bob = app.register("bob").await;

        let math = app.add(&app.system, "MATH100", &[]).await;
        let course = app.add(&bob, "CS150", &["MATH100"]).await;

        assert_eq!(course.prerequisites.len(), 1);
        assert_eq!(course.prerequisites[0].id, math.id);
        assert_eq!(course.prerequisites[0].owner_id, app.system.acting_owner);
    }

    #[tokio::test]
    async fn own_course_wins_over_system_course_with_same_code() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        app.add(&app.system, "MATH100", &[]).await;
        let own = app.add(&alice, "MATH100", &[]).await;
        let course = app.add(&alice, "CS150", &["MATH100"]).await;

        assert_eq!(course.prerequisites.len(), 1);
        assert_eq!(course.prerequisites[0].id, own.id);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn rename_keeps_incoming_edges() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        app.add(&alice, "CS101", &[]).await;
        app.add(&alice, "CS201", &["CS101"]).await;

        let renamed = CourseService::update_course(
            &app.db,
            alice.acting_owner,
            alice.system_owner,
            "CS101",
            &draft_with("CS110", "Intro Renamed", Department::Mathematics, &[]),
        )
        .await
        .unwrap();
        assert_eq!(renamed.code, "CS110");
        assert_eq!(renamed.name, "Intro Renamed");
        assert_eq!(renamed.department, Department::Mathematics);

        let dependent = QueryCourseService::get_course(&app.db, alice.acting_owner, "CS201")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dependent.prerequisite_codes(), ["CS110"]);
    }

    #[tokio::test]
    async fn prerequisites_are_replaced() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        app.add(&alice, "CS101", &[]).await;
        app.add(&alice, "CS102", &[]).await;
        app.add(&alice, "CS201", &["CS101"]).await;

        let updated = CourseService::update_course(
            &app.db,
            alice.acting_owner,
            alice.system_owner,
            "CS201",
            &draft("CS201", &["CS102"]),
        )
        .await
        .unwrap();

        assert_eq!(updated.prerequisite_codes(), ["CS102"]);
    }

    #[tokio::test]
    async fn rename_onto_existing_code_is_rejected() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        app.add(&alice, "CS101", &[]).await;
        app.add(&alice, "CS102", &[]).await;

        let err = CourseService::update_course(
            &app.db,
            alice.acting_owner,
            alice.system_owner,
            "CS102",
            &draft("CS101", &[]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateCourseCode(ref code) if code == "CS101"));
    }

    #[tokio::test]
    async fn missing_course_is_reported() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let err = CourseService::update_course(
            &app.db,
            alice.acting_owner,
            alice.system_owner,
            "CS404",
            &draft("CS404", &[]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFoundOrForbidden(_)));
    }

    #[tokio::test]
    async fn failed_relink_leaves_course_untouched() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        app.add(&alice, "CS101", &[]).await;
        app.add(&alice, "CS201", &["CS101"]).await;

        let err = CourseService::update_course(
            &app.db,
            alice.acting_owner,
            alice.system_owner,
            "CS201",
            &draft_with("CS201", "Changed", Department::English, &["NOPE"]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::PrerequisiteNotFound(_)));

        let stored = QueryCourseService::get_course(&app.db, alice.acting_owner, "CS201")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "CS201 name");
        assert_eq!(stored.department, Department::Informatics);
        assert_eq!(stored.prerequisite_codes(), ["CS101"]);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn deleting_a_prerequisite_detaches_its_dependents() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        app.add(&alice, "CS101", &[]).await;
        app.add(&alice, "CS201", &["CS101"]).await;

        let name = CourseService::delete_course(&app.db, alice.acting_owner, "CS101")
            .await
            .unwrap();
        assert_eq!(name, "CS101 name");

        assert!(
            QueryCourseService::get_course(&app.db, alice.acting_owner, "CS101")
                .await
                .unwrap()
                .is_none()
        );
        let dependent = QueryCourseService::get_course(&app.db, alice.acting_owner, "CS201")
            .await
            .unwrap()
            .unwrap();
        assert!(dependent.prerequisites.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_dependent_keeps_its_prerequisites() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        app.add(&alice, "CS101", &[]).await;
        app.add(&alice, "CS201", &["CS101"]).await;

        CourseService::delete_course(&app.db, alice.acting_owner, "CS201")
            .await
            .unwrap();

        assert!(
            QueryCourseService::get_course(&app.db, alice.acting_owner, "CS101")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn missing_course_is_reported() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let err = CourseService::delete_course(&app.db, alice.acting_owner, "CS404")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFoundOrForbidden(ref code) if code == "CS404"));
    }
}

mod authorization {
    use super::*;

    #[tokio::test]
    async fn system_course_is_read_only_for_users() {
        let app = TestDb::spawn().await;
        let carol = app.register("carol").await;

        let math = app.add(&app.system, "MATH100", &[]).await;

        let err = CourseService::authorize_mutation(&app.db, &carol, math.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(ref code) if code == "MATH100"));

        let allowed = CourseService::authorize_mutation(&app.db, &app.system, math.id)
            .await
            .unwrap();
        assert_eq!(allowed.id, math.id);
    }

    #[tokio::test]
    async fn other_users_course_is_not_found() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;

        let course = app.add(&alice, "CS101", &[]).await;

        let err = CourseService::authorize_mutation(&app.db, &bob, course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFoundOrForbidden(_)));

        let own = CourseService::authorize_mutation(&app.db, &alice, course.id)
            .await
            .unwrap();
        assert_eq!(own.course_code, "CS101");
    }
}
