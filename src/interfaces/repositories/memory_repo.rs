//! In-process repositories backed by a lock-guarded map. Selected with
//! `database_backend = "memory"`; each instance owns its own data.

use std::{cmp::Reverse, collections::HashMap};

use async_trait::async_trait;
use bson::oid::ObjectId;
use parking_lot::RwLock;

use crate::{
    entities::{contact::ContactMessage, project::Project},
    errors::AppError,
    repositories::{contact::ContactRepository, project::ProjectRepository},
};

#[derive(Default)]
pub struct InMemoryProjectRepo {
    projects: RwLock<HashMap<ObjectId, Project>>,
}

impl InMemoryProjectRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepo {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let mut projects = self.projects.read().values().cloned().collect::<Vec<_>>();
        projects.sort_by_key(|p| Reverse((p.created_at, p.id)));
        Ok(projects)
    }

    async fn get_project_by_id(&self, id: &ObjectId) -> Result<Option<Project>, AppError> {
        Ok(self.projects.read().get(id).cloned())
    }

    async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        let mut projects = self.projects.write();
        if projects.contains_key(&project.id) {
            return Err(AppError::Conflict("_id".into()));
        }
        projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn replace_project(&self, project: &Project) -> Result<Option<Project>, AppError> {
        let mut projects = self.projects.write();
        Ok(projects.get_mut(&project.id).map(|stored| {
            *stored = project.clone();
            stored.clone()
        }))
    }

    async fn delete_project(&self, id: &ObjectId) -> Result<bool, AppError> {
        Ok(self.projects.write().remove(id).is_some())
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryContactRepo {
    messages: RwLock<HashMap<ObjectId, ContactMessage>>,
}

impl InMemoryContactRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepo {
    async fn insert_contact_message(&self, msg: &ContactMessage) -> Result<(), AppError> {
        let mut messages = self.messages.write();
        if messages.contains_key(&msg.id) {
            return Err(AppError::Conflict("_id".into()));
        }
        messages.insert(msg.id, msg.clone());
        Ok(())
    }

    async fn get_contact_message_by_id(&self, id: &ObjectId) -> Result<Option<ContactMessage>, AppError> {
        Ok(self.messages.read().get(id).cloned())
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        let mut messages = self.messages.read().values().cloned().collect::<Vec<_>>();
        messages.sort_by_key(|m| Reverse((m.created_at, m.id)));
        Ok(messages)
    }

    async fn delete_contact_message(&self, id: &ObjectId) -> Result<bool, AppError> {
        Ok(self.messages.write().remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::NewProject;

    fn project(title: &str) -> Project {
        Project::new(NewProject {
            title: title.into(),
            description: "d".into(),
            image_url: None,
            demo_url: None,
            code_url: None,
            categories: None,
            tech_stack: None,
            tags: None,
        })
    }

    #[actix_rt::test]
    async fn lists_newest_first() {
        let repo = InMemoryProjectRepo::new();
        let first = project("first");
        let second = project("second");
        repo.insert_project(&first).await.unwrap();
        repo.insert_project(&second).await.unwrap();

        let titles = repo.list_projects().await.unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect::<Vec<_>>();

        assert_eq!(titles, vec!["second", "first"]);
    }

    #[actix_rt::test]
    async fn duplicate_ids_conflict() {
        let repo = InMemoryProjectRepo::new();
        let p = project("p");
        repo.insert_project(&p).await.unwrap();

        assert!(matches!(repo.insert_project(&p).await, Err(AppError::Conflict(field)) if field == "_id"));
    }

    #[actix_rt::test]
    async fn replace_and_delete_report_missing_documents() {
        let repo = InMemoryProjectRepo::new();
        let p = project("ghost");

        assert_eq!(repo.replace_project(&p).await.unwrap(), None);
        assert!(!repo.delete_project(&p.id).await.unwrap());
    }
}
