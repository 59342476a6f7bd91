use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    entities::{contact::NewContactMessage, project::{NewProject, ProjectPatch}},
    errors::{AccessError, AppError},
    validation::{Mode, RuleSet, ValidationRules},
    AppState,
};

/// A request body type guarded by one of the rule sets.
pub trait GatedPayload: DeserializeOwned + 'static {
    const MODE: Mode;

    fn rule_set(rules: &ValidationRules) -> &RuleSet;
}

impl GatedPayload for NewProject {
    const MODE: Mode = Mode::Full;

    fn rule_set(rules: &ValidationRules) -> &RuleSet {
        &rules.project
    }
}

impl GatedPayload for ProjectPatch {
    const MODE: Mode = Mode::Partial;

    fn rule_set(rules: &ValidationRules) -> &RuleSet {
        &rules.project
    }
}

impl GatedPayload for NewContactMessage {
    const MODE: Mode = Mode::Full;

    fn rule_set(rules: &ValidationRules) -> &RuleSet {
        &rules.contact
    }
}

/// Extractor that runs the rule set before the handler is entered.
/// A failing body is answered with 400 and the full field/message list;
/// the handler only ever sees trimmed, escaped, declared fields.
/// Usage: add `body: Validated<NewProject>` as a handler parameter.
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: GatedPayload> FromRequest for Validated<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let body = web::Json::<Value>::from_request(&req, payload);

        Box::pin(async move {
            let body = body.await?.into_inner();

            let state = req.app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::InternalError("AppState missing in request gate".into()))?;

            let fields = T::rule_set(&state.rules).check(&body, T::MODE)?;

            let payload = serde_json::from_value(Value::Object(fields))
                .map_err(|e| AppError::InternalError(format!("Gated payload did not deserialize: {}", e)))?;

            Ok(Validated(payload))
        })
    }
}

/// Extractor for the admin routes. When no admin token is configured the
/// routes are public; otherwise `Authorization: Bearer <token>` must match.
/// Returns 401 on a missing or wrong token.
#[derive(Debug)]
pub struct AdminAccess;

impl FromRequest for AdminAccess {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(AppError::InternalError("AppState missing in admin guard".into()).into()));
        };

        match state.admin_token.as_deref() {
            None => ready(Ok(AdminAccess)),
            Some(expected) if bearer_token(req).is_some_and(|token| tokens_match(token, expected)) => {
                ready(Ok(AdminAccess))
            }
            Some(_) => ready(Err(AccessError::MissingCredentials.into())),
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let (scheme, token) = header.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
}

/// Compares every byte regardless of where the first mismatch is.
fn tokens_match(supplied: &str, expected: &str) -> bool {
    let (supplied, expected) = (supplied.as_bytes(), expected.as_bytes());
    if supplied.len() != expected.len() {
        return false;
    }

    supplied
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn tokens_match_only_on_identical_bytes() {
        assert!(tokens_match("test-admin-token-01", "test-admin-token-01"));
        assert!(!tokens_match("test-admin-token-02", "test-admin-token-01"));
        assert!(!tokens_match("test-admin-token", "test-admin-token-01"));
        assert!(!tokens_match("", "test-admin-token-01"));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "bearer abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
