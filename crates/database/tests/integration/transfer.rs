use database::{
    error::ServiceError,
    services::{query_course::QueryCourseService, transfer::TransferService},
};
use models::{
    source_type::SourceType,
    transfer::{ExportScope, TransferError},
    visibility::CourseFilter,
};

use crate::common::{TestDb, codes};

const HEADER: &str = "course_code,course_name,credits,department,dependencies\n";

mod import {
    use super::*;

    #[tokio::test]
    async fn valid_rows_are_kept_when_others_fail() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let csv = format!(
            "{HEADER}\
             CS101,Intro,3,Informatics,\n\
             CS102,Discrete Structures,4,Mathematics,\n\
             CS201,Data Structures,4,Software Technologies,CS101\n\
             DB200,Databases,5,Database,\"CS101,CS102\"\n\
             ENG100,English,2,English,\n\
             BAD1,Bad Credits,-2,Informatics,\n\
             BAD2,Bad Department,3,Cooking,\n"
        );

        let report = TransferService::import_courses(&app.db, &alice, csv.as_bytes())
            .await
            .unwrap();

        assert_eq!(report.imported.len(), 5);
        assert_eq!(
            report.errors,
            [
                "Invalid credits value for course: BAD1",
                "Invalid department 'Cooking' for course: BAD2",
            ]
        );
        assert_eq!(
            report.summary(),
            "Import completed. Successfully imported 5 courses. 2 errors."
        );

        let db200 = QueryCourseService::get_course(&app.db, alice.acting_owner, "DB200")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(db200.source_type, SourceType::Imported);
        assert_eq!(db200.prerequisite_codes(), ["CS101", "CS102"]);
    }

    #[tokio::test]
    async fn forward_references_are_resolved() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let csv = format!(
            "{HEADER}\
             CS301,Algorithms,4,Informatics,CS201\n\
             CS201,Data Structures,4,Informatics,CS101\n\
             CS101,Intro,3,Informatics,\n"
        );

        let report = TransferService::import_courses(&app.db, &alice, csv.as_bytes())
            .await
            .unwrap();

        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.imported, ["CS101", "CS201", "CS301"]);
    }

    #[tokio::test]
    async fn unresolvable_rows_are_reported() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let csv = format!(
            "{HEADER}\
             CS201,Data Structures,4,Informatics,CS999\n\
             CS101,Intro,3,Informatics,\n\
             CS101,Intro Again,3,Informatics,\n"
        );

        let report = TransferService::import_courses(&app.db, &alice, csv.as_bytes())
            .await
            .unwrap();

        assert_eq!(report.imported, ["CS101"]);
        assert_eq!(
            report.errors,
            [
                "Failed to add course CS201: Prerequisite course 'CS999' does not exist in your courses or system courses.",
                "Failed to add course CS101: A course with code 'CS101' already exists in your account.",
            ]
        );
    }

    #[tokio::test]
    async fn credits_beyond_column_range_are_rejected() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let csv = format!(
            "{HEADER}\
             BIG,Big,3000000000,Other,\n\
             CS101,Intro,3,Informatics,\n"
        );

        let report = TransferService::import_courses(&app.db, &alice, csv.as_bytes())
            .await
            .unwrap();

        assert_eq!(report.imported, ["CS101"]);
        assert_eq!(report.errors, ["Invalid credits value for course: BIG"]);
    }

    #[tokio::test]
    async fn rows_may_depend_on_system_courses() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;
        let math = app.add(&app.system, "MATH100", &[]).await;

        let csv = format!("{HEADER}CS150,Applied Math,3,Informatics,MATH100\n");
        TransferService::import_courses(&app.db, &alice, csv.as_bytes())
            .await
            .unwrap();

        let course = QueryCourseService::get_course(&app.db, alice.acting_owner, "CS150")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(course.prerequisites[0].id, math.id);
    }

    #[tokio::test]
    async fn wrong_header_imports_nothing() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        let csv = "code,name,credits,department,dependencies\nCS101,Intro,3,Informatics,\n";
        let err = TransferService::import_courses(&app.db, &alice, csv.as_bytes())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidFormat(TransferError::InvalidHeader)
        ));

        let owned = QueryCourseService::list_owned_courses(
            &app.db,
            alice.acting_owner,
            &CourseFilter::default(),
        )
        .await
        .unwrap();
        assert!(owned.is_empty());
    }
}

mod export {
    use super::*;

    #[tokio::test]
    async fn scope_selects_courses() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;

        app.add(&app.system, "MATH100", &[]).await;
        app.add(&alice, "CS101", &["MATH100"]).await;

        let mine = TransferService::export_courses(&app.db, &alice, ExportScope::Mine)
            .await
            .unwrap();
        let text = String::from_utf8(mine).unwrap();
        assert!(text.starts_with('\u{feff}'));
        assert!(text.contains("CS101,CS101 name,3,Informatics,MATH100\n"));
        assert!(!text.contains("MATH100,"));

        let all = TransferService::export_courses(&app.db, &alice, ExportScope::All)
            .await
            .unwrap();
        let text = String::from_utf8(all).unwrap();
        assert!(text.contains("MATH100,MATH100 name,3,Informatics,\n"));
    }

    #[tokio::test]
    async fn export_reimports_into_a_fresh_account() {
        let app = TestDb::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;

        app.add(&app.system, "MATH100", &[]).await;
        app.add(&alice, "CS101", &[]).await;
        app.add(&alice, "CS201", &["CS101"]).await;
        app.add(&alice, "CS301", &["CS201", "MATH100"]).await;

        let bytes = TransferService::export_courses(&app.db, &alice, ExportScope::Mine)
            .await
            .unwrap();
        let report = TransferService::import_courses(&app.db, &bob, &bytes)
            .await
            .unwrap();
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.imported.len(), 3);

        let imported = QueryCourseService::list_owned_courses(
            &app.db,
            bob.acting_owner,
            &CourseFilter::default(),
        )
        .await
        .unwrap();
        assert_eq!(codes(&imported), ["CS101", "CS201", "CS301"]);

        let cs301 = imported.iter().find(|c| c.code == "CS301").unwrap();
        assert_eq!(cs301.prerequisite_codes(), ["CS201", "MATH100"]);
        let cs201_prereq = cs301.prerequisites.iter().find(|p| p.code == "CS201").unwrap();
        assert_eq!(cs201_prereq.owner_id, bob.acting_owner);
        let math_prereq = cs301.prerequisites.iter().find(|p| p.code == "MATH100").unwrap();
        assert_eq!(math_prereq.owner_id, app.system.acting_owner);
    }
}
