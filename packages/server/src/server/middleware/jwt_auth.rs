use crate::domains::auth::JwtService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// Authenticated user information from JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub is_admin: bool,
}

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds AuthUser to request extensions.
/// If no token or invalid token, request continues without AuthUser; handlers decide whether to refuse it.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(user) = extract_auth_user(&request, &jwt_service) {
        debug!("Authenticated user: {} (admin: {})", user.user_id, user.is_admin);
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.user_id,
        email: claims.email,
        is_admin: claims.is_admin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(header: Option<String>) -> axum::http::Request<axum::body::Body> {
        let mut builder = axum::http::Request::builder();
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = JwtService::new("test_secret", "nmwrap".to_string());
        let token = jwt_service
            .create_token("user-7", "owner@example.org", true)
            .unwrap();

        let auth_user = extract_auth_user(&request_with(Some(format!("Bearer {}", token))), &jwt_service);
        assert_eq!(
            auth_user,
            Some(AuthUser {
                user_id: "user-7".to_string(),
                email: "owner@example.org".to_string(),
                is_admin: true,
            })
        );
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = JwtService::new("test_secret", "nmwrap".to_string());
        let token = jwt_service
            .create_token("user-7", "owner@example.org", false)
            .unwrap();

        let auth_user = extract_auth_user(&request_with(Some(token)), &jwt_service).unwrap();
        assert_eq!(auth_user.user_id, "user-7");
        assert!(!auth_user.is_admin);
    }

    #[test]
    fn test_no_auth_header() {
        let jwt_service = JwtService::new("test_secret", "nmwrap".to_string());
        assert!(extract_auth_user(&request_with(None), &jwt_service).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let jwt_service = JwtService::new("test_secret", "nmwrap".to_string());
        let request = request_with(Some("Bearer invalid_token".to_string()));
        assert!(extract_auth_user(&request, &jwt_service).is_none());
    }
}
