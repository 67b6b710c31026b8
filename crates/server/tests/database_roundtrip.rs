mod common;

use axum::http::StatusCode;
use collegejump_api_types::views::DatabasePage;
use collegejump_core::domain::{Body, Email, Heading};
use collegejump_server::archive::Snapshot;
use collegejump_server::repository::{
    AnnouncementContent, AnnouncementRepository, AssignmentContent, Attachment, DocumentFile,
    NewSubmission, SubmissionRepository, SyllabusRepository,
};
use common::{Part, TestApp};

/// Fills every table with at least one row.
async fn populate(app: &TestApp) -> String {
    let admin = app.create_user("Ada", "ada@example.com", true).await;
    let mentor = app.create_user("Mia", "mia@example.com", false).await;
    let student = app.create_user("Stu", "stu@example.com", false).await;
    let semester = app.create_semester("Fall", 1).await;
    app.enroll(student.id, &[semester.id]).await;
    app.set_mentors(student.id, &[mentor.id]).await;

    let syllabus = SyllabusRepository::new(&app.state.db);
    let week = syllabus
        .append_week(
            semester.id,
            Heading::new("Essays").expect("heading"),
            Body::new("Intro").expect("body"),
        )
        .await
        .expect("week");
    let assignment = syllabus
        .set_assignment(
            week.id,
            Some(AssignmentContent {
                name: Heading::new("Draft").expect("heading"),
                instructions: Body::new("500 words").expect("body"),
            }),
        )
        .await
        .expect("assignment")
        .expect("assignment created");
    syllabus
        .add_document(
            week.id,
            DocumentFile {
                name: "rubric.pdf".to_string(),
                data: vec![0, 159, 146, 150, 255],
            },
        )
        .await
        .expect("document");

    let submissions = SubmissionRepository::new(&app.state.db);
    let submission = submissions
        .create(NewSubmission {
            assignment_id: assignment.id,
            author_id: student.id,
            text: Body::new("My essay").expect("body"),
            attachment: Some(Attachment {
                filename: "essay.docx".to_string(),
                data: b"essay bytes".to_vec(),
            }),
        })
        .await
        .expect("submission");
    submissions
        .add_feedback(submission.id, mentor.id, Body::new("Good").expect("body"))
        .await
        .expect("feedback");

    AnnouncementRepository::new(&app.state.db)
        .create(
            &Email::parse(&admin.email).expect("email"),
            AnnouncementContent {
                title: Heading::new("Welcome").expect("heading"),
                content: Body::new("Hello everyone").expect("body"),
            },
        )
        .await
        .expect("announcement");

    app.cookie_for(&admin).await
}

#[tokio::test]
async fn export_then_import_reproduces_the_database() {
    let app = TestApp::new().await;
    let cookie = populate(&app).await;
    let before = Snapshot::load(&app.state.db).await.expect("snapshot");

    let export = app.get("/database/export", Some(&cookie)).await;
    assert_eq!(export.status, StatusCode::OK);
    assert_eq!(export.header("content-type"), Some("application/zip"));
    let disposition = export.header("content-disposition").expect("attachment");
    assert!(disposition.starts_with("attachment; filename=\"collegejump-export-"));
    assert!(disposition.ends_with(".zip\""));

    // Diverge from the exported state before restoring it.
    let syllabus = SyllabusRepository::new(&app.state.db);
    let semester = syllabus.list_semesters().await.expect("semesters")[0].id;
    assert!(syllabus.delete_semester(semester).await.expect("delete"));
    app.create_user("Late", "late@example.com", false).await;

    let import = app
        .post_multipart(
            "/database/",
            Some(&cookie),
            &[Part::File("zipfile", "backup.zip", &export.body)],
        )
        .await;
    assert_eq!(import.status, StatusCode::SEE_OTHER);
    assert_eq!(import.location(), "/");

    let after = Snapshot::load(&app.state.db).await.expect("snapshot");
    assert_eq!(after, before);

    // The importing admin's session survives.
    let page = app.get("/database/", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    let page: DatabasePage = page.json();
    assert_eq!(page.tables["users"], 3);
    assert_eq!(page.tables["submissions"], 1);
}

#[tokio::test]
async fn malformed_archive_leaves_database_untouched() {
    let app = TestApp::new().await;
    let cookie = populate(&app).await;
    let before = Snapshot::load(&app.state.db).await.expect("snapshot");

    let response = app
        .post_multipart(
            "/database/",
            Some(&cookie),
            &[Part::File("zipfile", "backup.zip", b"PK not really a zip")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing = app
        .post_multipart("/database/", Some(&cookie), &[Part::Text("other", "x")])
        .await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);

    let after = Snapshot::load(&app.state.db).await.expect("snapshot");
    assert_eq!(after, before);
}

#[tokio::test]
async fn database_pages_are_admin_only() {
    let app = TestApp::new().await;
    populate(&app).await;
    let student = app.create_user("Other", "other@example.com", false).await;
    let cookie = app.cookie_for(&student).await;

    assert_eq!(
        app.get("/database/", Some(&cookie)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.get("/database/export", Some(&cookie)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.get("/database/export", None).await.status,
        StatusCode::UNAUTHORIZED
    );
}
