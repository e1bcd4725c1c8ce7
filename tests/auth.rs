use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use taskdash::auth::AuthMiddleware;
use taskdash::routes;
use taskdash::routes::health;

// A single connection keeps every query on the same in-memory database.
async fn setup_pool() -> SqlitePool {
    std::env::set_var("JWT_SECRET", "integration-test-secret");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    taskdash::db::init_schema(&pool)
        .await
        .expect("Failed to apply schema");
    pool
}

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                        .max_age(3600),
                )
                .wrap(Logger::default())
                .service(health::health)
                .service(
                    web::scope("/api")
                        .wrap(AuthMiddleware)
                        .configure(routes::config),
                ),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let pool = setup_pool().await;
    let app = test_app!(pool);

    // Register a new user
    let register_payload = json!({
        "name": "Integration User",
        "email": "Integration@Example.com",
        "password": "Password123!"
    });
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body_bytes = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes)
    );

    let register_response: taskdash::auth::AuthResponse =
        serde_json::from_slice(&body_bytes).expect("Failed to parse register response JSON");
    assert!(!register_response.token.is_empty());
    // Emails are normalized to lowercase at the boundary.
    assert_eq!(register_response.user.email, "integration@example.com");

    // Try to register the same email again (should conflict), case included
    let req_conflict = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "name": "Someone Else",
            "email": "integration@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp_conflict = test::call_service(&app, req_conflict).await;
    assert_eq!(resp_conflict.status(), actix_web::http::StatusCode::CONFLICT);

    // Login with the registered user
    let login_payload = json!({
        "email": "integration@example.com",
        "password": "Password123!"
    });
    let req_login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&login_payload)
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    let status_login = resp_login.status();
    let body_bytes_login = test::read_body(resp_login).await;
    assert_eq!(
        status_login,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes_login)
    );

    let login_response: taskdash::auth::AuthResponse =
        serde_json::from_slice(&body_bytes_login).expect("Failed to parse login response JSON");
    assert!(!login_response.token.is_empty());
    assert_eq!(login_response.user.id, register_response.user.id);

    // The token round-trips through /me to the same identity
    let req_me = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Bearer {}", login_response.token)))
        .to_request();
    let resp_me = test::call_service(&app, req_me).await;
    assert_eq!(resp_me.status(), actix_web::http::StatusCode::OK);
    let me: taskdash::models::User = test::read_body_json(resp_me).await;
    assert_eq!(me.id, register_response.user.id);
    assert_eq!(me.email, "integration@example.com");

    // A token with a tampered signature is rejected
    let mut tampered = login_response.token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'a' { 'b' } else { 'a' });
    let req_tampered = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Bearer {}", tampered)))
        .to_request();
    let resp_tampered = test::try_call_service(&app, req_tampered)
        .await
        .expect_err("tampered token should be rejected")
        .error_response();
    assert_eq!(
        resp_tampered.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let pool = setup_pool().await;
    let app = test_app!(pool);

    let test_cases = vec![
        // Deserialization errors (expect 400 for missing fields)
        (
            json!({ "email": "test@example.com", "password": "Password123!" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing name",
        ),
        (
            json!({ "name": "Test User", "password": "Password123!" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "name": "Test User", "email": "test@example.com" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (expect 422 after successful deserialization)
        (
            json!({ "name": "Test User", "email": "invalid-email", "password": "Password123!" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "name": "", "email": "test@example.com", "password": "Password123!" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "empty name",
        ),
        (
            json!({ "name": "Test User", "email": "test@example.com", "password": "123" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }

    // No record was created along the way
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[actix_rt::test]
async fn test_invalid_credentials_are_indistinguishable() {
    let pool = setup_pool().await;
    let app = test_app!(pool);

    // Register a known user
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "name": "Known User",
            "email": "known@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // Wrong password for a real account
    let req_wrong_pass = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&json!({
            "email": "known@example.com",
            "password": "WrongPassword123!"
        }))
        .to_request();
    let resp_wrong_pass = test::call_service(&app, req_wrong_pass).await;
    let status_wrong_pass = resp_wrong_pass.status();
    let body_wrong_pass = test::read_body(resp_wrong_pass).await;

    // Unknown email entirely
    let req_unknown = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&json!({
            "email": "nobody@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp_unknown = test::call_service(&app, req_unknown).await;
    let status_unknown = resp_unknown.status();
    let body_unknown = test::read_body(resp_unknown).await;

    assert_eq!(status_wrong_pass, actix_web::http::StatusCode::UNAUTHORIZED);
    assert_eq!(status_unknown, actix_web::http::StatusCode::UNAUTHORIZED);
    // Identical status and body: account existence must not leak.
    assert_eq!(body_wrong_pass, body_unknown);
}

#[actix_rt::test]
async fn test_profile_update() {
    let pool = setup_pool().await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "name": "Original Name",
            "email": "profile@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let auth: taskdash::auth::AuthResponse = test::read_body_json(resp).await;

    // Update name only
    let req_update = test::TestRequest::put()
        .uri("/api/auth/profile")
        .append_header(("Authorization", format!("Bearer {}", auth.token)))
        .set_json(&json!({ "name": "Updated Name" }))
        .to_request();
    let resp_update = test::call_service(&app, req_update).await;
    assert_eq!(resp_update.status(), actix_web::http::StatusCode::OK);
    let updated: taskdash::models::User = test::read_body_json(resp_update).await;
    assert_eq!(updated.name, "Updated Name");
    assert_eq!(updated.email, "profile@example.com");
    assert_eq!(updated.id, auth.user.id);
    assert!(updated.avatar.is_none());

    // Update avatar only; name must survive
    let req_avatar = test::TestRequest::put()
        .uri("/api/auth/profile")
        .append_header(("Authorization", format!("Bearer {}", auth.token)))
        .set_json(&json!({ "avatar": "https://example.com/a.png" }))
        .to_request();
    let resp_avatar = test::call_service(&app, req_avatar).await;
    assert_eq!(resp_avatar.status(), actix_web::http::StatusCode::OK);
    let updated: taskdash::models::User = test::read_body_json(resp_avatar).await;
    assert_eq!(updated.name, "Updated Name");
    assert_eq!(updated.avatar.as_deref(), Some("https://example.com/a.png"));

    // /me reflects the persisted changes
    let req_me = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Bearer {}", auth.token)))
        .to_request();
    let me: taskdash::models::User =
        test::read_body_json(test::call_service(&app, req_me).await).await;
    assert_eq!(me.name, "Updated Name");

    // The password was not touched by the profile update
    let req_login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&json!({
            "email": "profile@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    assert_eq!(resp_login.status(), actix_web::http::StatusCode::OK);

    // Without a token the profile endpoint is unreachable
    let req_anon = test::TestRequest::put()
        .uri("/api/auth/profile")
        .set_json(&json!({ "name": "Anonymous" }))
        .to_request();
    let resp_anon = test::try_call_service(&app, req_anon)
        .await
        .expect_err("unauthenticated profile update should be rejected")
        .error_response();
    assert_eq!(resp_anon.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}
