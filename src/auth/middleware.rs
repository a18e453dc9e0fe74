use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::role::Role;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

fn unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<BoxBody> {
    let resp = HttpResponse::Unauthorized().json(json!({
        "code": "unauthorized",
        "message": message
    }));
    req.into_response(resp.map_into_boxed_body())
}

/// Resolve the caller from the bearer token; `Err` carries the 401 message.
fn authenticate(req: &ServiceRequest, secret: &str) -> Result<AuthUser, &'static str> {
    let header_value = req
        .headers()
        .get("Authorization")
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header encoding")?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must start with Bearer")?;

    let claims = verify_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        "Invalid or expired token"
    })?;

    let role = Role::from_id(claims.role).ok_or("Invalid role")?;

    Ok(AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
        role,
        employee_id: claims.employee_id,
    })
}

/// Verifies the bearer token and stores the caller as an `AuthUser` request
/// extension. Failures short-circuit with 401.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let auth_user = match authenticate(&req, &config.jwt_secret) {
        Ok(user) => user,
        Err(message) => return Ok(unauthorized(req, message)),
    };

    tracing::debug!(user = %auth_user.username, role = ?auth_user.role, "Authenticated request");
    req.extensions_mut().insert(auth_user);

    next.call(req).await
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{TestApp, day};
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn malformed_credentials_are_rejected_with_a_reason() {
        let app = TestApp::new(day(), 8, 0);
        let svc = test::init_service(app.build()).await;

        for (header, reason) in [
            ("Token abc", "Authorization header must start with Bearer"),
            ("Bearer not-a-jwt", "Invalid or expired token"),
        ] {
            let resp = test::call_service(
                &svc,
                app.request(test::TestRequest::get().uri("/api/attendance/current"), header)
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], "unauthorized");
            assert_eq!(body["message"], reason);
        }
    }
}
