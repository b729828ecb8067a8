mod common;

use actix_web::{test, web, App};
use serde_json::json;
use tasknest::auth::{AuthMiddleware, TokenManager};
use tasknest::routes;

macro_rules! api_app {
    ($pool:expr, $manager:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new($manager.clone()))
                .wrap(AuthMiddleware)
                .configure(routes::config),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let manager = TokenManager::new("integration-secret", 24);
    let app = api_app!(pool, manager);

    // Make the email free to register.
    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind("maria@test.com")
        .execute(&pool)
        .await
        .unwrap();

    let payload = json!({
        "name": "Maria",
        "email": "maria@test.com",
        "password": "123456"
    });
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "maria@test.com");
    assert_eq!(body["name"], "Maria");
    assert!(body.get("password_hash").is_none());
    let first_id = body["id"].as_i64().unwrap();

    // Second registration with the same email must conflict and leave the
    // original record unchanged.
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&json!({
            "name": "Impostor",
            "email": "maria@test.com",
            "password": "654321"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let row: (String,) = sqlx::query_as("SELECT name FROM users WHERE id = $1")
        .bind(first_id as i32)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, "Maria");

    // Login with the registered credentials.
    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(&json!({
            "email": "maria@test.com",
            "password": "123456"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_owned();
    assert!(!token.is_empty());
    assert_eq!(body["user"]["email"], "maria@test.com");
    assert!(body["user"].get("password_hash").is_none());

    // The token opens protected routes.
    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "maria@test.com");
}

#[actix_rt::test]
async fn test_login_rejects_bad_credentials_identically() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let manager = TokenManager::new("integration-secret", 24);
    let app = api_app!(pool, manager);

    common::create_user(&pool, "Joana", "joana@test.com", "123456").await;

    // Wrong password.
    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(&json!({
            "email": "joana@test.com",
            "password": "wrong-password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let wrong_password: serde_json::Value = test::read_body_json(resp).await;

    // Unknown email: same status, same message, no field leak.
    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(&json!({
            "email": "nobody@test.com",
            "password": "123456"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let unknown_email: serde_json::Value = test::read_body_json(resp).await;

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["error"], "Invalid credentials.");
}

#[actix_rt::test]
async fn test_registration_validation_reports_all_fields() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let manager = TokenManager::new("integration-secret", 24);
    let app = api_app!(pool, manager);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&json!({
            "name": "",
            "email": "not-an-email",
            "password": "123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn test_me_answers_404_when_the_user_is_gone() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let manager = TokenManager::new("integration-secret", 24);
    let app = api_app!(pool, manager);

    // A valid token can outlive its account.
    let user_id = common::create_user(&pool, "Efemero", "efemero@test.com", "123456").await;
    let token = manager.issue(user_id).expect("token issue failed");

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User not found.");
}

#[actix_rt::test]
async fn test_protected_routes_require_token() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let manager = TokenManager::new("integration-secret", 24);
    let app = api_app!(pool, manager);

    let req = test::TestRequest::get().uri("/tasks").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Token missing.");

    // Health stays open.
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
