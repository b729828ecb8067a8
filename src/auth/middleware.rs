use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenManager;
use crate::error::AppError;

/// Authorization gate applied to the whole application.
///
/// Public routes (health check, registration, login, debug endpoints) pass
/// through untouched. Every other request must carry a well-formed
/// `Authorization: Bearer <token>` header; on success the resolved user id
/// is inserted into request extensions for handlers to extract.
pub struct AuthMiddleware;

fn is_public(path: &str, method: &Method) -> bool {
    path == "/health"
        || path == "/sessions"
        || (path == "/users" && method == Method::POST)
        || path == "/debug"
        || path.starts_with("/debug/")
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.path(), req.method()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let header = match req.headers().get("Authorization") {
            Some(value) => value,
            None => {
                let err = AppError::Unauthorized("Token missing.".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        // Expect exactly the "Bearer <token>" scheme.
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty());

        let token = match token {
            Some(token) => token.to_owned(),
            None => {
                let err = AppError::Unauthorized("Token error.".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        let manager = match req.app_data::<web::Data<TokenManager>>() {
            Some(manager) => manager,
            None => {
                let err = AppError::Internal("TokenManager not configured".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        match manager.verify(&token) {
            Ok(user_id) => {
                req.extensions_mut().insert(user_id);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, test, App, HttpResponse, Responder};

    #[get("/protected")]
    async fn protected(user: crate::auth::extractors::AuthenticatedUserId) -> impl Responder {
        HttpResponse::Ok().json(serde_json::json!({ "user_id": user.0 }))
    }

    #[get("/health")]
    async fn open() -> impl Responder {
        HttpResponse::Ok().finish()
    }

    macro_rules! gate_app {
        ($manager:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($manager))
                    .wrap(AuthMiddleware)
                    .service(protected)
                    .service(open),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn test_missing_token_rejected() {
        let app = gate_app!(TokenManager::new("mw-secret", 24));

        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Token missing.");
    }

    #[actix_rt::test]
    async fn test_malformed_header_rejected() {
        let app = gate_app!(TokenManager::new("mw-secret", 24));

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", "Basic abc123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Token error.");
    }

    #[actix_rt::test]
    async fn test_invalid_token_rejected() {
        let app = gate_app!(TokenManager::new("mw-secret", 24));

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", "Bearer not-a-real-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid token.");
    }

    #[actix_rt::test]
    async fn test_valid_token_passes_user_id() {
        let manager = TokenManager::new("mw-secret", 24);
        let token = manager.issue(99).unwrap();
        let app = gate_app!(manager);

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["user_id"], 99);
    }

    #[actix_rt::test]
    async fn test_public_path_bypasses_gate() {
        let app = gate_app!(TokenManager::new("mw-secret", 24));

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[::core::prelude::v1::test]
    fn test_public_path_table() {
        assert!(is_public("/health", &Method::GET));
        assert!(is_public("/sessions", &Method::POST));
        assert!(is_public("/users", &Method::POST));
        assert!(is_public("/debug/data", &Method::GET));
        assert!(is_public("/debug/reset", &Method::POST));
        // Only the /debug segment itself is open, not lookalike prefixes.
        assert!(!is_public("/debugger", &Method::GET));
        assert!(!is_public("/debugging/data", &Method::GET));
        assert!(!is_public("/me", &Method::GET));
        assert!(!is_public("/tasks", &Method::GET));
        assert!(!is_public("/users", &Method::GET));
    }
}
