use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use insights_core::{NewPage, NewPost, NewSocialMediaUser};
use insights_scraper::{DocumentExtractor, HtmlExtractor, PageFetcher, PlaceholderExtractor};
use insights_service::{CacheLayer, Ingestor, MemoryCacheStore, OpenAiSummaryGenerator};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

// -------------------------------------------------------------------------
// Helpers
// -------------------------------------------------------------------------

fn memory_cache() -> CacheLayer {
    CacheLayer::new(
        Arc::new(MemoryCacheStore::new(NonZeroUsize::new(64).expect("non-zero"))),
        Duration::from_secs(300),
    )
}

fn app_with(pool: &PgPool, extractor: Arc<dyn DocumentExtractor>, cache: CacheLayer) -> Router {
    let ingestor = Arc::new(Ingestor::new(pool.clone(), extractor, 20, 50));
    let summarizer = Arc::new(
        OpenAiSummaryGenerator::new(None, "http://127.0.0.1:1/v1/chat/completions", "test-model")
            .expect("client builds"),
    );
    build_app(AppState {
        service: PageService::new(pool.clone(), ingestor, cache, summarizer),
        pagination: PaginationDefaults {
            default_page_size: 10,
            max_page_size: 100,
        },
    })
}

fn placeholder_app(pool: &PgPool) -> Router {
    app_with(
        pool,
        Arc::new(PlaceholderExtractor::new("https://www.linkedin.com")),
        memory_cache(),
    )
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json parse")
    };
    (status, request_id, json)
}

async fn seed_page(pool: &PgPool, page_id: &str, followers: i64, industry: &str) {
    insights_db::upsert_page(
        pool,
        &NewPage {
            page_id: page_id.to_string(),
            page_name: format!("{page_id} Holdings"),
            page_url: format!("https://www.linkedin.com/company/{page_id}/"),
            linkedin_id: None,
            profile_picture_url: None,
            description: None,
            website: None,
            industry: Some(industry.to_string()),
            total_followers: followers,
            head_count: None,
            specialties: vec![],
            location: None,
            founded_year: None,
            company_type: None,
        },
    )
    .await
    .expect("seed page");
}

async fn seed_posts(pool: &PgPool, page_id: &str, count: usize) {
    for i in 0..count {
        insights_db::upsert_post(
            pool,
            &NewPost {
                post_id: insights_core::synthetic_post_id(page_id, i),
                page_id: page_id.to_string(),
                content: format!("post {i}"),
                post_url: format!("https://www.linkedin.com/company/{page_id}/posts/"),
                media_urls: vec![],
                likes: 0,
                comments_count: 0,
                reposts: 0,
                posted_at: None,
                comments: vec![],
            },
        )
        .await
        .expect("seed post");
    }
}

async fn seed_users(pool: &PgPool, page_id: &str, count: usize) {
    for i in 0..count {
        insights_db::upsert_user(
            pool,
            &NewSocialMediaUser {
                user_id: insights_core::synthetic_user_id(page_id, i),
                name: format!("Person {i}"),
                profile_url: String::new(),
                profile_picture_url: None,
                headline: None,
                position: None,
                company_page_id: Some(page_id.to_string()),
            },
        )
        .await
        .expect("seed user");
    }
}

// -------------------------------------------------------------------------
// Root and health
// -------------------------------------------------------------------------

#[test]
fn ingestion_failed_maps_to_bad_gateway() {
    let response = ApiError::new("req-1", "ingestion_failed", "upstream 500").into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn unknown_code_maps_to_internal_error() {
    let response = ApiError::new("req-1", "internal_error", "boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[sqlx::test(migrations = "../../migrations")]
async fn root_describes_the_api(pool: PgPool) {
    let (status, request_id, body) = send(&placeholder_app(&pool), "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(request_id.is_some());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["message"].is_string());
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_reports_database_ok(pool: PgPool) {
    let (status, _, body) = send(&placeholder_app(&pool), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

// -------------------------------------------------------------------------
// GET /api/v1/pages/{page_id}
// -------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn get_page_ingests_once_then_serves_cached_body(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company/acme/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Acme | LinkedIn</title></head><body>\
             <h1 class=\"top-card-layout__title\">Acme</h1>\
             <p>1,234 followers</p></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;
    for suffix in ["posts/", "people/"] {
        Mock::given(method("GET"))
            .and(path(format!("/company/acme/{suffix}")))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;
    }

    let fetcher = PageFetcher::new(&server.uri(), 5, "insights-test/1.0").expect("fetcher");
    let app = app_with(&pool, Arc::new(HtmlExtractor::new(fetcher)), memory_cache());

    let (status, _, first) = send(&app, "GET", "/api/v1/pages/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["page_id"], "acme");
    assert_eq!(first["page_name"], "Acme");
    assert_eq!(first["total_followers"], 1_234);

    let (status, _, second) = send(&app, "GET", "/api/v1/pages/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    assert!(insights_db::get_page(&pool, "acme").await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn upstream_failure_is_ingestion_failed(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(&server.uri(), 5, "insights-test/1.0").expect("fetcher");
    let app = app_with(&pool, Arc::new(HtmlExtractor::new(fetcher)), memory_cache());

    let (status, request_id, body) = send(&app, "GET", "/api/v1/pages/acme").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "ingestion_failed");
    assert!(body["error"]["message"].as_str().unwrap().contains("500"));
    assert_eq!(body["meta"]["request_id"].as_str(), request_id.as_deref());
}

#[sqlx::test(migrations = "../../migrations")]
async fn malformed_page_id_is_a_validation_error(pool: PgPool) {
    let app = placeholder_app(&pool);

    let (status, _, body) = send(&app, "GET", "/api/v1/pages/bad%20id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, _, _) = send(&app, "GET", "/api/v1/pages/bad%20id/posts").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// -------------------------------------------------------------------------
// GET /api/v1/pages
// -------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_pages_applies_follower_bounds(pool: PgPool) {
    for (id, followers) in [("a", 999), ("b", 1_000), ("c", 3_000), ("d", 5_000), ("e", 5_001)] {
        seed_page(&pool, id, followers, "Technology").await;
    }

    let (status, _, body) = send(
        &placeholder_app(&pool),
        "GET",
        "/api/v1/pages?min_followers=1000&max_followers=5000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let followers: Vec<i64> = body["pages"]
        .as_array()
        .expect("pages array")
        .iter()
        .map(|p| p["total_followers"].as_i64().expect("followers"))
        .collect();
    assert_eq!(followers, vec![5_000, 3_000, 1_000]);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["total_pages"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_pages_filters_by_industry_and_name(pool: PgPool) {
    seed_page(&pool, "acme", 10, "Information Technology").await;
    seed_page(&pool, "globex", 20, "Energy").await;
    let app = placeholder_app(&pool);

    let (_, _, body) = send(&app, "GET", "/api/v1/pages?industry=tech").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["pages"][0]["page_id"], "acme");

    let (_, _, body) = send(&app, "GET", "/api/v1/pages?search=GLOBEX").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["pages"][0]["page_id"], "globex");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_pages_paginates(pool: PgPool) {
    for i in 0..5 {
        seed_page(&pool, &format!("p{i}"), i, "Retail").await;
    }

    let (status, _, body) = send(
        &placeholder_app(&pool),
        "GET",
        "/api/v1/pages?page=2&page_size=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pages"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 5);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["pages"][0]["page_id"], "p2");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_pages_rejects_bad_parameters(pool: PgPool) {
    let app = placeholder_app(&pool);

    for uri in [
        "/api/v1/pages?page=0",
        "/api/v1/pages?page_size=0",
        "/api/v1/pages?page_size=101",
        "/api/v1/pages?page=abc",
        "/api/v1/pages?min_followers=10&max_followers=5",
    ] {
        let (status, _, body) = send(&app, "GET", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        assert_eq!(body["error"]["code"], "validation_error", "uri: {uri}");
    }
}

// -------------------------------------------------------------------------
// Refresh, delete, summary
// -------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn refresh_creates_missing_page(pool: PgPool) {
    let (status, _, body) = send(
        &placeholder_app(&pool),
        "POST",
        "/api/v1/pages/acme/refresh",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page_id"], "acme");
    assert!(insights_db::get_page(&pool, "acme").await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_cascades_and_clears_cache(pool: PgPool) {
    seed_page(&pool, "acme", 100, "Technology").await;
    seed_posts(&pool, "acme", 5).await;
    seed_users(&pool, "acme", 3).await;
    let cache = memory_cache();
    let app = app_with(
        &pool,
        Arc::new(PlaceholderExtractor::new("https://www.linkedin.com")),
        cache.clone(),
    );

    let (status, _, _) = send(&app, "GET", "/api/v1/pages/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert!(cache.exists("page:acme").await);

    let (status, _, body) = send(&app, "DELETE", "/api/v1/pages/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page_id"], "acme");
    assert_eq!(body["deleted"]["pages"], 1);
    assert_eq!(body["deleted"]["posts"], 5);
    assert_eq!(body["deleted"]["users"], 3);
    assert!(!cache.exists("page:acme").await);
    assert_eq!(insights_db::count_posts_for_page(&pool, "acme").await.unwrap(), 0);
    assert_eq!(insights_db::count_users_for_page(&pool, "acme").await.unwrap(), 0);

    let (status, _, body) = send(&app, "DELETE", "/api/v1/pages/acme").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn summary_uses_stored_counts(pool: PgPool) {
    seed_page(&pool, "acme", 4_321, "Technology").await;
    seed_posts(&pool, "acme", 2).await;
    seed_users(&pool, "acme", 4).await;
    let app = placeholder_app(&pool);

    let (status, _, body) = send(&app, "GET", "/api/v1/pages/acme/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page_name"], "acme Holdings");
    assert_eq!(
        body["ai_summary"],
        insights_service::summary::MISSING_KEY_SUMMARY
    );
    assert_eq!(body["stats"]["followers"], 4_321);
    assert_eq!(body["stats"]["posts"], 2);
    assert_eq!(body["stats"]["employees"], 4);

    let (status, _, _) = send(&app, "GET", "/api/v1/pages/ghost/summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(insights_db::get_page(&pool, "ghost").await.unwrap().is_none());
}

// -------------------------------------------------------------------------
// Posts and employees
// -------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn posts_are_paginated(pool: PgPool) {
    seed_page(&pool, "acme", 1, "Technology").await;
    seed_posts(&pool, "acme", 5).await;

    let (status, _, body) = send(
        &placeholder_app(&pool),
        "GET",
        "/api/v1/pages/acme/posts?page=3&page_size=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 5);
    assert_eq!(body["total_pages"], 3);
    assert!(body["posts"][0]["comments"].is_array());
}

#[sqlx::test(migrations = "../../migrations")]
async fn employees_are_paginated(pool: PgPool) {
    seed_page(&pool, "acme", 1, "Technology").await;
    seed_users(&pool, "acme", 3).await;

    let (status, _, body) = send(
        &placeholder_app(&pool),
        "GET",
        "/api/v1/pages/acme/employees",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Person 0", "Person 1", "Person 2"]);
    assert_eq!(body["total"], 3);
    assert_eq!(body["total_pages"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_for_unknown_page_is_empty(pool: PgPool) {
    let (status, _, body) = send(&placeholder_app(&pool), "GET", "/api/v1/pages/ghost/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["total_pages"], 1);
}
