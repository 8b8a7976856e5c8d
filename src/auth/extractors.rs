use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// Extracts the authenticated user's id from request extensions.
///
/// Intended for routes behind `SessionGuard`, which verifies the token and
/// stores the resolved user id. If the id is missing the request never went
/// through the guard, and the caller is treated as not logged in.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserId(pub i32);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError; // AppError converts via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<i32>().copied() {
            Some(user_id) => ready(Ok(AuthenticatedUserId(user_id))),
            None => {
                let err = AppError::Forbidden("You are not logged in".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_extractor_reads_user_id_from_extensions() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(42_i32);

        let mut payload = Payload::None;
        let extracted = AuthenticatedUserId::from_request(&req, &mut payload).await;
        assert_eq!(extracted.unwrap().0, 42);
    }

    #[actix_rt::test]
    async fn test_extractor_rejects_unguarded_requests() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let extracted = AuthenticatedUserId::from_request(&req, &mut payload).await;
        assert!(extracted.is_err());

        let response = extracted.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
