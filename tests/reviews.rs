mod common;

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
};
use common::{location, text, TestApp};
use uuid::Uuid;

fn review<'a>(rating: &'a str, comment: &'a str) -> [(&'a str, &'a str); 2] {
    [("rating", rating), ("comment", comment)]
}

#[tokio::test]
async fn reviews_show_under_their_listing_in_order() {
    let app = TestApp::new().await;
    let mut alice = app.user("alice").await;
    let mut bob = app.user("bob").await;
    let id = alice.create_listing("Cabin", "100").await;

    let response = bob.post_form(&format!("/listings/{id}/reviews"), &review("4", "Lovely <em>view</em>")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/listings/{id}"));
    bob.post_form(&format!("/listings/{id}/reviews"), &review("2", "Noisy at night")).await;

    let (author_id,): (Uuid,) = sqlx::query_as("SELECT author_id FROM reviews LIMIT 1")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(author_id, app.user_id("bob").await);

    let page = text(bob.get(&format!("/listings/{id}")).await).await;
    assert!(page.contains("New Review Created!"));
    assert!(page.contains("@bob"));
    assert!(page.contains("Lovely &lt;em&gt;view&lt;/em&gt;"));
    assert_eq!(page.matches("data-review-id").count(), 2);
    let first = page.find("Lovely").unwrap();
    let second = page.find("Noisy at night").unwrap();
    assert!(first < second);
    assert!(page.contains(&format!("/listings/{id}/reviews/")));

    // only the author sees delete buttons
    let page = text(alice.get(&format!("/listings/{id}")).await).await;
    assert!(!page.contains(&format!("/listings/{id}/reviews/")));
}

#[tokio::test]
async fn review_needs_login() {
    let app = TestApp::new().await;
    let id = app.user("alice").await.create_listing("Cabin", "100").await;

    let mut anonymous = app.client();
    let response = anonymous.post_form(&format!("/listings/{id}/reviews"), &review("5", "Great")).await;
    assert_eq!(location(&response), "/login");
    assert_eq!(app.count("reviews").await, 0);

    // no body, or one that isn't a form, still ends at the login page
    let request = Request::builder().method(Method::POST).uri(format!("/listings/{id}/reviews")).body(Body::empty()).unwrap();
    let response = anonymous.send(request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/listings/{id}/reviews"))
        .header("content-type", "application/json")
        .body(Body::from(r#"{"rating":5}"#))
        .unwrap();
    assert_eq!(location(&anonymous.send(request).await), "/login");
    assert_eq!(app.count("reviews").await, 0);

    // the review form is only offered to logged in users
    assert!(!text(anonymous.get(&format!("/listings/{id}")).await).await.contains("Leave a Review"));
}

#[tokio::test]
async fn invalid_reviews_are_rejected() {
    let app = TestApp::new().await;
    let mut alice = app.user("alice").await;
    let id = alice.create_listing("Cabin", "100").await;

    for (rating, comment) in [("7", "Great"), ("0", "Great"), ("five", "Great"), ("3", "  ")] {
        let response = alice.post_form(&format!("/listings/{id}/reviews"), &review(rating, comment)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{rating} {comment:?}");
    }
    assert_eq!(app.count("reviews").await, 0);
    assert_eq!(app.count("listing_reviews").await, 0);
}

#[tokio::test]
async fn review_on_missing_listing() {
    let app = TestApp::new().await;
    let mut alice = app.user("alice").await;

    let response = alice
        .post_form(&format!("/listings/{}/reviews", Uuid::now_v7()), &review("5", "Great"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/listings");
    assert_eq!(app.count("reviews").await, 0);

    assert!(text(alice.get("/listings").await).await.contains("Listing you requested for does not exist!"));
}

#[tokio::test]
async fn only_the_author_deletes_a_review() {
    let app = TestApp::new().await;
    let mut alice = app.user("alice").await;
    let mut bob = app.user("bob").await;
    let id = alice.create_listing("Cabin", "100").await;
    let other = alice.create_listing("Loft", "200").await;

    bob.post_form(&format!("/listings/{id}/reviews"), &review("4", "Nice")).await;
    let (review_id,): (Uuid,) = sqlx::query_as("SELECT id FROM reviews")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();

    // even the listing owner can't remove someone else's review
    let response = alice.post_form(&format!("/listings/{id}/reviews/{review_id}?_method=DELETE"), &[]).await;
    assert_eq!(location(&response), format!("/listings/{id}"));
    assert_eq!(app.count("reviews").await, 1);
    assert!(text(alice.get(&format!("/listings/{id}")).await).await.contains("You are not the author of this review"));

    // a review is only reachable through the listing it belongs to
    bob.post_form(&format!("/listings/{other}/reviews/{review_id}?_method=DELETE"), &[]).await;
    assert_eq!(app.count("reviews").await, 1);
    assert_eq!(app.count("listing_reviews").await, 1);

    let response = bob.post_form(&format!("/listings/{id}/reviews/{review_id}?_method=DELETE"), &[]).await;
    assert_eq!(location(&response), format!("/listings/{id}"));
    assert_eq!(app.count("reviews").await, 0);
    assert_eq!(app.count("listing_reviews").await, 0);

    let page = text(bob.get(&format!("/listings/{id}")).await).await;
    assert!(page.contains("Review Deleted!"));
    assert!(!page.contains("data-review-id"));
}

#[tokio::test]
async fn deleting_a_listing_deletes_its_reviews() {
    let app = TestApp::new().await;
    let mut alice = app.user("alice").await;
    let mut bob = app.user("bob").await;
    let id = alice.create_listing("Cabin", "100").await;
    let kept = alice.create_listing("Loft", "200").await;

    bob.post_form(&format!("/listings/{id}/reviews"), &review("4", "Nice")).await;
    bob.post_form(&format!("/listings/{id}/reviews"), &review("1", "Cold")).await;
    bob.post_form(&format!("/listings/{kept}/reviews"), &review("5", "Warm")).await;
    assert_eq!(app.count("reviews").await, 3);

    let response = alice.post_form(&format!("/listings/{id}?_method=DELETE"), &[]).await;
    assert_eq!(location(&response), "/listings");

    assert_eq!(app.count("listings").await, 1);
    assert_eq!(app.count("reviews").await, 1);
    assert_eq!(app.count("listing_reviews").await, 1);
}
