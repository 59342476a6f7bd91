use async_trait::async_trait;
use bson::{doc, oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use crate::{
    entities::project::Project,
    errors::AppError,
    repositories::mongo_repo::MongoProjectRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, newest first.
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: &ObjectId) -> Result<Option<Project>, AppError>;
    async fn insert_project(&self, project: &Project) -> Result<(), AppError>;
    /// Replaces the stored document with the same id. `None` when it no longer exists.
    async fn replace_project(&self, project: &Project) -> Result<Option<Project>, AppError>;
    /// `false` when nothing matched.
    async fn delete_project(&self, id: &ObjectId) -> Result<bool, AppError>;
    async fn check_connection(&self) -> Result<(), AppError>;
}

/// BSON shape of a project in the `projects` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub code_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectDocument> for Project {
    fn from(doc: ProjectDocument) -> Self {
        Project {
            id: doc.id,
            title: doc.title,
            description: doc.description,
            image_url: doc.image_url,
            demo_url: doc.demo_url,
            code_url: doc.code_url,
            categories: doc.categories,
            tech_stack: doc.tech_stack,
            tags: doc.tags,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

impl From<&Project> for ProjectDocument {
    fn from(project: &Project) -> Self {
        ProjectDocument {
            id: project.id,
            title: project.title.clone(),
            description: project.description.clone(),
            image_url: project.image_url.clone(),
            demo_url: project.demo_url.clone(),
            code_url: project.code_url.clone(),
            categories: project.categories.clone(),
            tech_stack: project.tech_stack.clone(),
            tags: project.tags.clone(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepo {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = self.collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?
            .try_collect::<Vec<_>>()
            .await?
            .into_iter()
            .map(Project::from)
            .collect();

        Ok(projects)
    }

    async fn get_project_by_id(&self, id: &ObjectId) -> Result<Option<Project>, AppError> {
        let project = self.collection
            .find_one(doc! { "_id": *id })
            .await?
            .map(Project::from);

        Ok(project)
    }

    async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        self.collection
            .insert_one(ProjectDocument::from(project))
            .await?;

        Ok(())
    }

    async fn replace_project(&self, project: &Project) -> Result<Option<Project>, AppError> {
        let updated = self.collection
            .find_one_and_replace(doc! { "_id": project.id }, ProjectDocument::from(project))
            .return_document(ReturnDocument::After)
            .await?
            .map(Project::from);

        Ok(updated)
    }

    async fn delete_project(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.collection
            .delete_one(doc! { "_id": *id })
            .await?;

        Ok(result.deleted_count > 0)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await?;

        Ok(())
    }
}
