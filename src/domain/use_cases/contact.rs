use std::sync::Arc;

use crate::{
    entities::contact::{ContactMessage, NewContactMessage},
    errors::AppError,
    repositories::contact::ContactRepository,
    utils::object_id::valid_object_id,
};

const RESOURCE: &str = "Contact message";

pub struct ContactHandler<R>
where
    R: ContactRepository + ?Sized,
{
    pub contact_repo: Arc<R>,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository + ?Sized,
{
    pub fn new(contact_repo: Arc<R>) -> Self {
        ContactHandler { contact_repo }
    }

    /// Stores a new contact-form submission
    pub async fn create_contact_message(&self, form: NewContactMessage) -> Result<ContactMessage, AppError> {
        let msg = ContactMessage::new(form);
        msg.check_schema()?;

        self.contact_repo.insert_contact_message(&msg).await?;
        tracing::info!(message_id = %msg.id, "contact message received");

        Ok(msg)
    }

    /// Retrieves a contact message by its ID
    pub async fn get_contact_message_by_id(&self, id: &str) -> Result<ContactMessage, AppError> {
        let valid_id = valid_object_id(id)?;

        self.contact_repo
            .get_contact_message_by_id(&valid_id)
            .await?
            .ok_or_else(|| AppError::NotFound(RESOURCE.into()))
    }

    /// Lists all contact messages, newest first
    pub async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        self.contact_repo.list_contact_messages().await
    }

    /// Deletes a contact message by its ID
    pub async fn delete_contact_message(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_object_id(id)?;

        if self.contact_repo.delete_contact_message(&valid_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(RESOURCE.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::contact::MockContactRepository;

    #[actix_rt::test]
    async fn malformed_ids_never_reach_storage() {
        let mut repo = MockContactRepository::new();
        repo.expect_get_contact_message_by_id().never();
        repo.expect_delete_contact_message().never();
        let handler = ContactHandler::new(Arc::new(repo));

        assert!(matches!(
            handler.delete_contact_message("abc").await,
            Err(AppError::MalformedReference { .. })
        ));
        assert!(matches!(
            handler.get_contact_message_by_id("abc").await,
            Err(AppError::MalformedReference { .. })
        ));
    }

    #[actix_rt::test]
    async fn missing_messages_are_not_found() {
        let mut repo = MockContactRepository::new();
        repo.expect_delete_contact_message().returning(|_| Ok(false));
        let handler = ContactHandler::new(Arc::new(repo));

        let result = handler.delete_contact_message("000000000000000000000000").await;
        assert!(matches!(result, Err(AppError::NotFound(r)) if r == "Contact message"));
    }

    #[actix_rt::test]
    async fn submissions_are_stored_once() {
        let mut repo = MockContactRepository::new();
        repo.expect_insert_contact_message().times(1).returning(|_| Ok(()));
        let handler = ContactHandler::new(Arc::new(repo));

        let msg = handler
            .create_contact_message(NewContactMessage {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                message: "Hello".into(),
            })
            .await
            .unwrap();

        assert_eq!(msg.created_at, msg.updated_at);
    }
}
