use async_trait::async_trait;
use bson::{doc, oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::{
    entities::contact::ContactMessage,
    errors::AppError,
    repositories::mongo_repo::MongoContactRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn insert_contact_message(&self, msg: &ContactMessage) -> Result<(), AppError>;
    async fn get_contact_message_by_id(&self, id: &ObjectId) -> Result<Option<ContactMessage>, AppError>;
    /// All messages, newest first.
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError>;
    async fn delete_contact_message(&self, id: &ObjectId) -> Result<bool, AppError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<ContactDocument> for ContactMessage {
    fn from(doc: ContactDocument) -> Self {
        ContactMessage {
            id: doc.id,
            name: doc.name,
            email: doc.email,
            message: doc.message,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

impl From<&ContactMessage> for ContactDocument {
    fn from(msg: &ContactMessage) -> Self {
        ContactDocument {
            id: msg.id,
            name: msg.name.clone(),
            email: msg.email.clone(),
            message: msg.message.clone(),
            created_at: msg.created_at,
            updated_at: msg.updated_at,
        }
    }
}

#[async_trait]
impl ContactRepository for MongoContactRepo {
    async fn insert_contact_message(&self, msg: &ContactMessage) -> Result<(), AppError> {
        self.collection
            .insert_one(ContactDocument::from(msg))
            .await?;

        Ok(())
    }

    async fn get_contact_message_by_id(&self, id: &ObjectId) -> Result<Option<ContactMessage>, AppError> {
        let msg = self.collection
            .find_one(doc! { "_id": *id })
            .await?
            .map(ContactMessage::from);

        Ok(msg)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        let messages = self.collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?
            .try_collect::<Vec<_>>()
            .await?
            .into_iter()
            .map(ContactMessage::from)
            .collect();

        Ok(messages)
    }

    async fn delete_contact_message(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.collection
            .delete_one(doc! { "_id": *id })
            .await?;

        Ok(result.deleted_count > 0)
    }
}
