//! Request extractor for the authenticated user

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::{token_from_headers, verify_token, NOT_AUTHORIZED};
use crate::db::{parse_object_id, Filter};
use crate::error::AppError;
use crate::features::FeatureState;
use crate::models::{user, Actor, Role, User};

/// The user behind the session token on this request
///
/// Rejects with `Unauthorized` when the token is missing, invalid, expired
/// or names a user that no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    FeatureState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = FeatureState::from_ref(state);
        let unauthorized = || AppError::Unauthorized(NOT_AUTHORIZED.to_string());

        let token = token_from_headers(&parts.headers).ok_or_else(unauthorized)?;
        let claims = verify_token(&token, &state.config.auth)?;
        let id = parse_object_id(&claims.sub).map_err(|_| unauthorized())?;

        let document = state
            .store
            .find_one(user::COLLECTION, &Filter::by_id(id))
            .await?
            .ok_or_else(unauthorized)?;

        let user = User::from_document(document)?;
        tracing::debug!(user_id = %user.id, role = %user.role, "Authenticated request");

        Ok(CurrentUser(user))
    }
}

/// Fail with `Forbidden` unless the actor holds one of `roles`
pub fn require_role(actor: &Actor, roles: &[Role]) -> Result<(), AppError> {
    if actor.has_role(roles) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            actor.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_require_role() {
        let actor = Actor {
            id: ObjectId::new(),
            role: Role::User,
        };
        assert!(require_role(&actor, &[Role::User, Role::Admin]).is_ok());

        let err = require_role(&actor, &[Role::Publisher, Role::Admin]).unwrap_err();
        assert_eq!(err.to_string(), "User role user is not authorized to access this route");
    }
}
