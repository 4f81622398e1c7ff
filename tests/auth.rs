mod common;

use axum::http::StatusCode;
use common::{location, text, TestApp};

#[tokio::test]
async fn login_returns_to_the_requested_page() {
    let app = TestApp::new().await;
    app.user("alice").await;

    let mut client = app.client();
    let response = client.get("/listings/new").await;
    assert_eq!(location(&response), "/login");
    assert!(text(client.get("/login").await).await.contains("You must be logged in first!"));

    let response = client.post_form("/login", &[("username", "alice"), ("password", "pw")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/listings/new");

    let page = text(client.get("/listings/new").await).await;
    assert!(page.contains("Welcome back to Wanderlust!"));
    assert!(page.contains("Create a New Listing"));
}

#[tokio::test]
async fn login_without_a_pending_page_goes_to_listings() {
    let app = TestApp::new().await;
    app.user("alice").await;

    let response = app.client().post_form("/login", &[("username", "alice"), ("password", "pw")]).await;
    assert_eq!(location(&response), "/listings");
}

#[tokio::test]
async fn wrong_password() {
    let app = TestApp::new().await;
    app.user("alice").await;

    let mut client = app.client();
    for (username, password) in [("alice", "nope"), ("nobody", "pw")] {
        let response = client.post_form("/login", &[("username", username), ("password", password)]).await;
        assert_eq!(location(&response), "/login");
    }
    assert!(text(client.get("/login").await).await.contains("Password or username is incorrect"));
    assert_eq!(location(&client.get("/listings/new").await), "/login");
}

#[tokio::test]
async fn signup_logs_in_and_rejects_duplicates() {
    let app = TestApp::new().await;
    let mut alice = app.user("alice").await;

    let page = text(alice.get("/listings").await).await;
    assert!(page.contains("Welcome to Wanderlust!"));
    assert!(page.contains("Log out"));

    let mut client = app.client();
    let response = client
        .post_form("/signup", &[("username", "alice"), ("email", "other@example.com"), ("password", "pw2")])
        .await;
    assert_eq!(location(&response), "/signup");
    assert!(text(client.get("/signup").await).await.contains("A user with the given username is already registered"));
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn logout() {
    let app = TestApp::new().await;
    let mut alice = app.user("alice").await;

    let response = alice.get("/logout").await;
    assert_eq!(location(&response), "/listings");
    assert!(text(alice.get("/listings").await).await.contains("You are logged out!"));
    assert_eq!(location(&alice.get("/listings/new").await), "/login");
}
