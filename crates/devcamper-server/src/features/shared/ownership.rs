//! Ownership-checked reads and writes
//!
//! Bootcamps, courses and reviews belong to the user in their `user` field.
//! Writes embed the ownership predicate in the store condition
//! (`_id = id AND user = actor`, relaxed for admins), so the check and the
//! write cannot race. When a conditional write matches nothing, a follow-up
//! read tells a missing document apart from someone else's.

use mongodb::bson::{oid::ObjectId, Document};
use thiserror::Error;

use crate::db::{DbError, DocumentStore, Filter, Update};
use crate::error::AppError;
use crate::models::Actor;

/// Field holding the owning user id
pub const OWNER_FIELD: &str = "user";

/// A collection of owned documents and how to name it in messages
#[derive(Debug, Clone, Copy)]
pub struct Resource {
    pub collection: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Error)]
pub enum OwnershipError {
    #[error("No {resource} with the id of {id}")]
    NotFound { resource: &'static str, id: ObjectId },

    #[error("User {user} is not authorized to {action} this {resource}")]
    Forbidden {
        user: ObjectId,
        action: &'static str,
        resource: &'static str,
    },

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<OwnershipError> for AppError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::NotFound { .. } => AppError::NotFound(err.to_string()),
            OwnershipError::Forbidden { .. } => AppError::Forbidden(err.to_string()),
            OwnershipError::Database(e) => e.into(),
        }
    }
}

/// Write condition for `id` as seen by `actor`
pub fn owner_filter(id: ObjectId, actor: &Actor) -> Filter {
    let by_id = Filter::by_id(id);
    if actor.is_admin() {
        by_id
    } else {
        by_id.and(Filter::eq(OWNER_FIELD, actor.id))
    }
}

/// Whether `actor` may modify `document`
pub fn can_modify(document: &Document, actor: &Actor) -> bool {
    actor.is_admin() || document.get_object_id(OWNER_FIELD).ok() == Some(actor.id)
}

/// Load a document or fail with `NotFound`
pub async fn find_existing(
    store: &dyn DocumentStore,
    resource: Resource,
    id: ObjectId,
) -> Result<Document, OwnershipError> {
    store
        .find_one(resource.collection, &Filter::by_id(id))
        .await?
        .ok_or(OwnershipError::NotFound {
            resource: resource.name,
            id,
        })
}

/// Load a document the actor is allowed to modify
pub async fn find_owned(
    store: &dyn DocumentStore,
    resource: Resource,
    id: ObjectId,
    actor: &Actor,
    action: &'static str,
) -> Result<Document, OwnershipError> {
    let document = find_existing(store, resource, id).await?;
    if can_modify(&document, actor) {
        Ok(document)
    } else {
        Err(forbidden(resource, actor, action))
    }
}

/// Update a document only if the actor owns it
#[tracing::instrument(skip(store, update), fields(collection = resource.collection, %id, actor = %actor.id))]
pub async fn update_owned(
    store: &dyn DocumentStore,
    resource: Resource,
    id: ObjectId,
    actor: &Actor,
    update: &Update,
) -> Result<Document, OwnershipError> {
    match store
        .update_one(resource.collection, &owner_filter(id, actor), update)
        .await?
    {
        Some(document) => Ok(document),
        None => Err(classify_miss(store, resource, id, actor, "update").await),
    }
}

/// Delete a document only if the actor owns it
#[tracing::instrument(skip(store), fields(collection = resource.collection, %id, actor = %actor.id))]
pub async fn delete_owned(
    store: &dyn DocumentStore,
    resource: Resource,
    id: ObjectId,
    actor: &Actor,
) -> Result<Document, OwnershipError> {
    match store
        .delete_one(resource.collection, &owner_filter(id, actor))
        .await?
    {
        Some(document) => Ok(document),
        None => Err(classify_miss(store, resource, id, actor, "delete").await),
    }
}

fn forbidden(resource: Resource, actor: &Actor, action: &'static str) -> OwnershipError {
    OwnershipError::Forbidden {
        user: actor.id,
        action,
        resource: resource.name,
    }
}

async fn classify_miss(
    store: &dyn DocumentStore,
    resource: Resource,
    id: ObjectId,
    actor: &Actor,
    action: &'static str,
) -> OwnershipError {
    match store.find_one(resource.collection, &Filter::by_id(id)).await {
        Ok(Some(_)) => {
            tracing::warn!("Conditional write rejected by ownership predicate");
            forbidden(resource, actor, action)
        },
        Ok(None) => OwnershipError::NotFound {
            resource: resource.name,
            id,
        },
        Err(e) => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::Role;
    use mongodb::bson::doc;

    const THINGS: Resource = Resource {
        collection: "things",
        name: "thing",
    };

    fn actor(role: Role) -> Actor {
        Actor {
            id: ObjectId::new(),
            role,
        }
    }

    async fn seed(store: &MemoryStore, owner: &Actor) -> ObjectId {
        store
            .insert_one("things", doc! { "name": "a", "user": owner.id })
            .await
            .unwrap()
            .get_object_id("_id")
            .unwrap()
    }

    #[tokio::test]
    async fn test_owner_can_update() {
        let store = MemoryStore::new();
        let owner = actor(Role::Publisher);
        let id = seed(&store, &owner).await;

        let updated = update_owned(&store, THINGS, id, &owner, &Update::set(doc! { "name": "b" }))
            .await
            .unwrap();
        assert_eq!(updated.get_str("name").unwrap(), "b");
    }

    #[tokio::test]
    async fn test_stranger_is_forbidden_and_document_untouched() {
        let store = MemoryStore::new();
        let owner = actor(Role::Publisher);
        let stranger = actor(Role::Publisher);
        let id = seed(&store, &owner).await;

        let err = update_owned(&store, THINGS, id, &stranger, &Update::set(doc! { "name": "b" }))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("User {} is not authorized to update this thing", stranger.id)
        );

        let err = delete_owned(&store, THINGS, id, &stranger).await.unwrap_err();
        assert!(matches!(err, OwnershipError::Forbidden { action: "delete", .. }));

        let stored = store.find_one("things", &Filter::by_id(id)).await.unwrap().unwrap();
        assert_eq!(stored.get_str("name").unwrap(), "a");
    }

    #[tokio::test]
    async fn test_admin_bypasses_ownership() {
        let store = MemoryStore::new();
        let owner = actor(Role::Publisher);
        let id = seed(&store, &owner).await;

        assert!(delete_owned(&store, THINGS, id, &actor(Role::Admin)).await.is_ok());
        assert!(store.find_one("things", &Filter::by_id(id)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        let err = delete_owned(&store, THINGS, id, &actor(Role::Admin)).await.unwrap_err();
        assert_eq!(err.to_string(), format!("No thing with the id of {}", id));

        let app: AppError = err.into();
        assert_eq!(app.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_find_owned() {
        let store = MemoryStore::new();
        let owner = actor(Role::Publisher);
        let id = seed(&store, &owner).await;

        assert!(find_owned(&store, THINGS, id, &owner, "update").await.is_ok());
        let err = find_owned(&store, THINGS, id, &actor(Role::User), "update")
            .await
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.status_code(), axum::http::StatusCode::FORBIDDEN);
    }
}
