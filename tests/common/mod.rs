#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, Method, StatusCode},
    response::Response,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use uuid::Uuid;
use wanderlust::{db, uploads::ImageStore, App, AppState};

pub const BOUNDARY: &str = "wanderlust-test-boundary";

/// The whole app over an in-memory database and a scratch upload directory.
pub struct TestApp {
    pub app: App,
    pub db_pool: SqlitePool,
    pub uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> TestApp {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::migrate(&db_pool).await.unwrap();

        let uploads = tempfile::tempdir().unwrap();
        let images = ImageStore::open(uploads.path()).await.unwrap();
        let state = AppState { db_pool: db_pool.clone(), images };

        let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
        let app = wanderlust::with_method_override(wanderlust::router(state, 1024 * 1024).layer(session_layer));

        TestApp { app, db_pool, uploads }
    }

    /// A browser with its own cookie.
    pub fn client(&self) -> Client {
        Client { app: self.app.clone(), cookie: None }
    }

    /// Signs a new user up and returns a client logged in as them.
    pub async fn user(&self, username: &str) -> Client {
        let mut client = self.client();
        let email = format!("{username}@example.com");
        let response = client
            .post_form("/signup", &[("username", username), ("email", email.as_str()), ("password", "pw")])
            .await;
        assert_eq!(location(&response), "/listings");
        client
    }

    pub async fn user_id(&self, username: &str) -> Uuid {
        let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE username=?")
            .bind(username)
            .fetch_one(&self.db_pool)
            .await
            .unwrap();
        id
    }

    pub async fn count(&self, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.db_pool)
            .await
            .unwrap();
        count
    }
}

pub struct Client {
    app: App,
    cookie: Option<String>,
}

impl Client {
    pub async fn send(&mut self, mut request: Request) -> Response {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(header::COOKIE, cookie.parse().unwrap());
        }
        let response = self.app.clone().oneshot(request).await.unwrap();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_owned());
        }
        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_multipart(&mut self, uri: &str, fields: &[(&str, &str)], image: Option<(&str, &str, &[u8])>) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(multipart(fields, image)))
            .unwrap();
        self.send(request).await
    }

    /// Creates a listing and returns its id.
    pub async fn create_listing(&mut self, title: &str, price: &str) -> Uuid {
        let response = self
            .post_multipart("/listings", &listing_fields(title, price), None)
            .await;
        let location = location(&response);
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{location}");
        location.trim_start_matches("/listings/").parse().unwrap()
    }
}

pub fn listing_fields<'a>(title: &'a str, price: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("title", title),
        ("description", "A quiet place by the lake"),
        ("price", price),
        ("location", "X"),
        ("country", "Y"),
    ]
}

pub fn multipart(fields: &[(&str, &str)], image: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_owned())
        .unwrap_or_default()
}

pub async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
