#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use collegejump_core::domain::{Email, Heading, NewPassword, PersonName, SemesterId, UserId};
use collegejump_server::api::{AppState, create_app};
use collegejump_server::auth::{SESSION_COOKIE, hash_password};
use collegejump_server::config::ServerConfig;
use collegejump_server::db::init_pool_and_migrate;
use collegejump_server::repository::{
    NewUser, SemesterRecord, SessionRepository, SyllabusRepository, UserRecord, UserRepository,
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

pub const SETUP_KEY: &str = "test-setup-key";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub state: Arc<AppState>,
    router: Router,
    password_hash: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|err| {
            panic!(
                "response is not the expected JSON ({err}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn location(&self) -> &str {
        self.headers
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("response should redirect")
    }

    /// `name=value` of the session cookie set by this response.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .find(|pair| pair.starts_with(SESSION_COOKIE))
            .map(str::to_string)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

impl TestApp {
    pub async fn new() -> Self {
        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            setup_key: Some(SETUP_KEY.to_string()),
            ..ServerConfig::default()
        };

        let db = init_pool_and_migrate(&config.database_url)
            .await
            .expect("in-memory database should migrate");
        let state = Arc::new(
            AppState::new(db, config)
                .await
                .expect("state should initialize"),
        );
        let router = create_app(state.clone());

        let password = NewPassword::new(PASSWORD, PASSWORD).expect("valid password");
        let password_hash = hash_password(&password).expect("hashing succeeds");

        Self {
            state,
            router,
            password_hash,
        }
    }

    /// Creates an account whose password is [`PASSWORD`].
    pub async fn create_user(&self, name: &str, email: &str, admin: bool) -> UserRecord {
        UserRepository::new(&self.state.db)
            .create(NewUser {
                name: PersonName::new(name).expect("valid name"),
                email: Email::parse(email).expect("valid email"),
                password_hash: self.password_hash.clone(),
                admin,
            })
            .await
            .expect("user should be created")
    }

    /// Session cookie for `user`, without going through the login form.
    pub async fn cookie_for(&self, user: &UserRecord) -> String {
        let token = SessionRepository::new(&self.state.db)
            .create(user.id)
            .await
            .expect("session should be created");
        format!("{SESSION_COOKIE}={token}")
    }

    pub async fn create_semester(&self, name: &str, order: i32) -> SemesterRecord {
        SyllabusRepository::new(&self.state.db)
            .create_semester(Heading::new(name).expect("valid name"), order)
            .await
            .expect("semester should be created")
    }

    pub async fn enroll(&self, user: UserId, semesters: &[SemesterId]) {
        UserRepository::new(&self.state.db)
            .set_enrollments(user, semesters)
            .await
            .expect("enrollment should be stored");
    }

    pub async fn set_mentors(&self, mentee: UserId, mentors: &[UserId]) {
        UserRepository::new(&self.state.db)
            .set_mentors(mentee, mentors)
            .await
            .expect("mentorship should be stored");
    }

    pub async fn user(&self, id: UserId) -> Option<UserRecord> {
        UserRepository::new(&self.state.db)
            .find_by_id(id)
            .await
            .expect("user lookup")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        cookie: Option<&str>,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(
            builder
                .body(Body::from(urlencode(fields)))
                .expect("valid request"),
        )
        .await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        cookie: Option<&str>,
        parts: &[Part<'_>],
    ) -> TestResponse {
        const BOUNDARY: &str = "collegejump-test-boundary";

        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).expect("valid request"))
            .await
    }
}

fn urlencode(fields: &[(&str, &str)]) -> String {
    fn encode(value: &str) -> String {
        value
            .bytes()
            .map(|byte| match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (byte as char).to_string()
                }
                b' ' => "+".to_string(),
                other => format!("%{other:02X}"),
            })
            .collect()
    }

    fields
        .iter()
        .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
