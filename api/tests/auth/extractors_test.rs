#[cfg(test)]
mod tests {
    use crate::helpers::app::{TEST_JWT_SECRET, init_test_config};
    use api::auth::{
        claims::{AuthUser, Claims},
        generate_jwt,
    };
    use axum::{
        extract::FromRequestParts,
        http::{Request, StatusCode},
    };
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn generate_token(claims: &Claims, secret: &str) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
    }

    fn now_secs() -> usize {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as usize
    }

    async fn extract(auth_header: Option<String>) -> Result<AuthUser, (StatusCode, &'static str)> {
        let mut builder = Request::builder();
        if let Some(value) = auth_header {
            builder = builder.header("Authorization", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_generated_token_round_trips() {
        init_test_config();
        let (token, _expiry) = generate_jwt(42, true);

        let user = extract(Some(format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.0.sub, 42);
        assert!(user.0.admin);
        assert_eq!(user.actor(), services::Actor::new(42, true));
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        init_test_config();
        let claims = Claims { sub: 1, exp: now_secs() + 3600, admin: false };
        let token = generate_token(&claims, "wrong_secret");

        let (status, message) = extract(Some(format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        init_test_config();
        let claims = Claims { sub: 1, exp: now_secs() - 3600, admin: false };
        let token = generate_token(&claims, TEST_JWT_SECRET);

        let (status, _) = extract(Some(format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        init_test_config();
        let (status, message) = extract(None).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Missing or invalid Authorization header");
    }
}
