mod common;

use axum::http::StatusCode;
use collegejump_api_types::views::{
    AnnouncementEditPage, AnnouncementListPage, AnnouncementView, FrontPage,
};
use collegejump_core::domain::{Body, Email, Heading};
use collegejump_server::repository::{AnnouncementContent, AnnouncementRepository};
use common::TestApp;

async fn post_announcement(app: &TestApp, author: &str, title: &str) {
    AnnouncementRepository::new(&app.state.db)
        .create(
            &Email::parse(author).expect("valid email"),
            AnnouncementContent {
                title: Heading::new(title).expect("valid title"),
                content: Body::new(format!("About {title}")).expect("valid body"),
            },
        )
        .await
        .expect("announcement should be created");
}

#[tokio::test]
async fn admin_creates_edits_and_deletes() {
    let app = TestApp::new().await;
    let admin = app.create_user("Ada", "ada@example.com", true).await;
    let cookie = app.cookie_for(&admin).await;

    let blank = app.get("/announcement/new", Some(&cookie)).await;
    assert_eq!(blank.status, StatusCode::OK);
    let blank: AnnouncementEditPage = blank.json();
    assert_eq!(blank.announcement_id, None);
    assert_eq!(blank.author, "ada@example.com");
    assert!(!blank.can_delete);

    let created = app
        .post_form(
            "/announcement/new",
            Some(&cookie),
            &[("title", "Welcome"), ("content", "Classes start Monday.")],
        )
        .await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);
    assert_eq!(created.location(), "/");

    let list: AnnouncementListPage = app.get("/announcement/", None).await.json();
    assert_eq!(list.announcements.len(), 1);
    let id = list.announcements[0].id;

    let edit = app
        .get(&format!("/announcement/{id}/edit"), Some(&cookie))
        .await;
    assert_eq!(edit.status, StatusCode::OK);
    let edit: AnnouncementEditPage = edit.json();
    assert_eq!(edit.announcement_id, Some(id));
    assert_eq!(edit.title, "Welcome");
    assert!(edit.can_delete);

    let updated = app
        .post_form(
            &format!("/announcement/{id}/edit"),
            Some(&cookie),
            &[("title", "Welcome back"), ("content", "Classes start Tuesday.")],
        )
        .await;
    assert_eq!(updated.status, StatusCode::SEE_OTHER);
    assert_eq!(updated.location(), "/");

    let shown: AnnouncementView = app
        .get(&format!("/announcement/{id}"), None)
        .await
        .json();
    assert_eq!(shown.title, "Welcome back");
    assert_eq!(shown.content, "Classes start Tuesday.");
    assert_eq!(shown.author, "ada@example.com");

    let deleted = app
        .post_form(
            &format!("/announcement/{id}/edit"),
            Some(&cookie),
            &[("title", ""), ("content", ""), ("delete", "on")],
        )
        .await;
    assert_eq!(deleted.status, StatusCode::SEE_OTHER);
    assert_eq!(deleted.location(), "/");

    let gone = app.get(&format!("/announcement/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let app = TestApp::new().await;
    let admin = app.create_user("Ada", "ada@example.com", true).await;
    let cookie = app.cookie_for(&admin).await;

    let response = app
        .post_form(
            "/announcement/new",
            Some(&cookie),
            &[("title", "   "), ("content", "")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let list: AnnouncementListPage = app.get("/announcement/", None).await.json();
    assert!(list.announcements.is_empty());
}

#[tokio::test]
async fn students_cannot_manage_announcements() {
    let app = TestApp::new().await;
    post_announcement(&app, "ada@example.com", "Welcome").await;
    let list: AnnouncementListPage = app.get("/announcement/", None).await.json();
    let id = list.announcements[0].id;

    let student = app.create_user("Sam", "sam@example.com", false).await;
    let cookie = app.cookie_for(&student).await;
    let edit_path = format!("/announcement/{id}/edit");

    assert_eq!(
        app.get("/announcement/new", Some(&cookie)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.get(&edit_path, Some(&cookie)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.post_form(
            "/announcement/new",
            Some(&cookie),
            &[("title", "Hijack"), ("content", "No")],
        )
        .await
        .status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.post_form(
            &edit_path,
            Some(&cookie),
            &[("title", ""), ("content", ""), ("delete", "on")],
        )
        .await
        .status,
        StatusCode::FORBIDDEN
    );

    let shown: AnnouncementView = app
        .get(&format!("/announcement/{id}"), Some(&cookie))
        .await
        .json();
    assert_eq!(shown.title, "Welcome");
}

#[tokio::test]
async fn anonymous_visitors_can_only_read() {
    let app = TestApp::new().await;
    post_announcement(&app, "ada@example.com", "Welcome").await;

    let list = app.get("/announcement/", None).await;
    assert_eq!(list.status, StatusCode::OK);
    let list: AnnouncementListPage = list.json();
    let id = list.announcements[0].id;

    let shown = app.get(&format!("/announcement/{id}"), None).await;
    assert_eq!(shown.status, StatusCode::OK);

    assert_eq!(
        app.get("/announcement/new", None).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.get(&format!("/announcement/{id}/edit"), None).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.post_form(
            "/announcement/new",
            None,
            &[("title", "Spam"), ("content", "Spam")],
        )
        .await
        .status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn list_is_newest_first_and_front_page_shows_ten() {
    let app = TestApp::new().await;
    for n in 1..=12 {
        post_announcement(&app, "ada@example.com", &format!("Notice {n}")).await;
    }

    let list: AnnouncementListPage = app.get("/announcement/", None).await.json();
    let titles: Vec<_> = list
        .announcements
        .iter()
        .map(|announcement| announcement.title.as_str())
        .collect();
    assert_eq!(titles.len(), 12);
    assert_eq!(titles[0], "Notice 12");
    assert_eq!(titles[11], "Notice 1");

    let front: FrontPage = app.get("/", None).await.json();
    assert_eq!(front.announcements.len(), 10);
    assert_eq!(front.announcements[0].title, "Notice 12");
    assert_eq!(front.announcements[9].title, "Notice 3");
}

#[tokio::test]
async fn missing_announcement_is_not_found() {
    let app = TestApp::new().await;
    let admin = app.create_user("Ada", "ada@example.com", true).await;
    let cookie = app.cookie_for(&admin).await;

    assert_eq!(
        app.get("/announcement/999", None).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.get("/announcement/999/edit", Some(&cookie)).await.status,
        StatusCode::NOT_FOUND
    );

    let deleted = app
        .post_form(
            "/announcement/999/edit",
            Some(&cookie),
            &[("title", ""), ("content", ""), ("delete", "on")],
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);

    let updated = app
        .post_form(
            "/announcement/999/edit",
            Some(&cookie),
            &[("title", "Ghost"), ("content", "Nobody home")],
        )
        .await;
    assert_eq!(updated.status, StatusCode::NOT_FOUND);
}
