//! HTTP-level integration tests for post CRUD, ownership, and pagination.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, login_user, post_json_auth, put_json_auth,
    register_user,
};
use sqlx::PgPool;

/// Register + login, returning the access token.
async fn access_token_for(pool: &PgPool, name: &str, email: &str) -> String {
    register_user(common::build_test_app(pool.clone()), name, email, "secret1").await;
    let login = login_user(common::build_test_app(pool.clone()), email, "secret1", &[]).await;
    login["tokens"]["access_token"].as_str().unwrap().to_string()
}

/// Create a post via the API, returning its id.
async fn create_post(pool: &PgPool, token: &str, heading: &str) -> i64 {
    let body = serde_json::json!({
        "heading": heading,
        "body": "A body that is long enough to pass validation.",
        "image_url": "https://img.example.com/cover.png"
    });
    let response = post_json_auth(common::build_test_app(pool.clone()), "/api/v1/posts", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Creating a post returns 201 with the author embedded.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_post_embeds_author(pool: PgPool) {
    let token = access_token_for(&pool, "Ana", "ana@x.com").await;

    let body = serde_json::json!({
        "heading": "First post",
        "body": "A body that is long enough to pass validation.",
        "image_url": "https://img.example.com/cover.png"
    });
    let response = post_json_auth(common::build_test_app(pool), "/api/v1/posts", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["heading"], "First post");
    assert_eq!(json["data"]["author"]["name"], "Ana");
    assert_eq!(json["data"]["author"]["email"], "ana@x.com");
}

/// Creation requires authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_post_requires_auth(pool: PgPool) {
    let body = serde_json::json!({
        "heading": "First post",
        "body": "A body that is long enough to pass validation.",
        "image_url": "https://img.example.com/cover.png"
    });
    let response = common::post_json(common::build_test_app(pool), "/api/v1/posts", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Validation failures return 400 before anything is written.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_post_validation(pool: PgPool) {
    let token = access_token_for(&pool, "Ana", "ana@x.com").await;

    let body = serde_json::json!({
        "heading": "Hi",
        "body": "short",
        "image_url": "not a url"
    });
    let response = post_json_auth(common::build_test_app(pool.clone()), "/api/v1/posts", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Update / delete ownership
// ---------------------------------------------------------------------------

/// Only the author may update; others get 403, missing posts 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_post_enforces_ownership(pool: PgPool) {
    let author = access_token_for(&pool, "Ana", "ana@x.com").await;
    let intruder = access_token_for(&pool, "Bob", "bob@x.com").await;
    let post_id = create_post(&pool, &author, "Ana's post").await;

    let update = serde_json::json!({ "heading": "Hijacked heading" });

    let forbidden = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/posts/{post_id}"),
        update.clone(),
        &intruder,
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let missing = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/posts/999999",
        update.clone(),
        &author,
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let ok = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/posts/{post_id}"),
        update,
        &author,
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_json(ok).await;
    assert_eq!(json["data"]["heading"], "Hijacked heading");
    // Untouched fields survive a partial update.
    assert_eq!(
        json["data"]["body"],
        "A body that is long enough to pass validation."
    );
}

/// An empty update body is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_post_requires_a_field(pool: PgPool) {
    let author = access_token_for(&pool, "Ana", "ana@x.com").await;
    let post_id = create_post(&pool, &author, "Ana's post").await;

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/posts/{post_id}"),
        serde_json::json!({}),
        &author,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Only the author may delete.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_post_enforces_ownership(pool: PgPool) {
    let author = access_token_for(&pool, "Ana", "ana@x.com").await;
    let intruder = access_token_for(&pool, "Bob", "bob@x.com").await;
    let post_id = create_post(&pool, &author, "Ana's post").await;

    let forbidden = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/posts/{post_id}"),
        &intruder,
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let ok = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/posts/{post_id}"),
        &author,
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);

    let gone = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/posts/{post_id}"),
        &author,
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// The public listing excludes the caller's own posts when authenticated,
/// but shows everything to anonymous callers.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_excludes_own_posts_for_authenticated_caller(pool: PgPool) {
    let ana = access_token_for(&pool, "Ana", "ana@x.com").await;
    let bob = access_token_for(&pool, "Bob", "bob@x.com").await;
    create_post(&pool, &ana, "Ana's post").await;
    create_post(&pool, &bob, "Bob's post").await;

    // Anonymous: both posts.
    let anon = get(common::build_test_app(pool.clone()), "/api/v1/posts").await;
    assert_eq!(anon.status(), StatusCode::OK);
    let json = body_json(anon).await;
    assert_eq!(json["data"]["pagination"]["total"], 2);

    // Ana sees only Bob's post.
    let mine_excluded = get_auth(common::build_test_app(pool), "/api/v1/posts", &ana).await;
    let json = body_json(mine_excluded).await;
    assert_eq!(json["data"]["pagination"]["total"], 1);
    assert_eq!(json["data"]["posts"][0]["author"]["name"], "Bob");
}

/// Pagination metadata is consistent and newest-first ordering holds.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_paginates_newest_first(pool: PgPool) {
    let ana = access_token_for(&pool, "Ana", "ana@x.com").await;
    for i in 1..=5 {
        create_post(&pool, &ana, &format!("Post {i}")).await;
    }

    let page1 = get(common::build_test_app(pool.clone()), "/api/v1/posts?page=1&limit=2").await;
    let json = body_json(page1).await;
    assert_eq!(json["data"]["posts"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["pagination"]["page"], 1);
    assert_eq!(json["data"]["pagination"]["limit"], 2);
    assert_eq!(json["data"]["pagination"]["total"], 5);
    assert_eq!(json["data"]["pagination"]["total_pages"], 3);
    assert_eq!(json["data"]["posts"][0]["heading"], "Post 5");

    let page3 = get(common::build_test_app(pool), "/api/v1/posts?page=3&limit=2").await;
    let json = body_json(page3).await;
    assert_eq!(json["data"]["posts"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["posts"][0]["heading"], "Post 1");
}

/// `/posts/mine` returns only the caller's posts.
#[sqlx::test(migrations = "../db/migrations")]
async fn my_posts_lists_only_own(pool: PgPool) {
    let ana = access_token_for(&pool, "Ana", "ana@x.com").await;
    let bob = access_token_for(&pool, "Bob", "bob@x.com").await;
    create_post(&pool, &ana, "Ana's post").await;
    create_post(&pool, &bob, "Bob's post").await;

    let response = get_auth(common::build_test_app(pool), "/api/v1/posts/mine", &ana).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["pagination"]["total"], 1);
    assert_eq!(json["data"]["posts"][0]["heading"], "Ana's post");
}
