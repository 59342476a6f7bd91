use std::sync::Arc;

use crate::{
    entities::project::{NewProject, Project, ProjectPatch},
    errors::AppError,
    repositories::project::ProjectRepository,
    settings::ImageUrlPolicy,
    utils::object_id::valid_object_id,
};

const RESOURCE: &str = "Project";

pub struct ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub project_repo: Arc<R>,
    pub image_url_policy: ImageUrlPolicy,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub fn new(project_repo: Arc<R>, image_url_policy: ImageUrlPolicy) -> Self {
        ProjectHandler { project_repo, image_url_policy }
    }

    /// Lists every project, newest first
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects().await
    }

    /// Retrieves a project by its ID
    pub async fn get_project_by_id(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_object_id(id)?;

        self.project_repo
            .get_project_by_id(&valid_id)
            .await?
            .ok_or_else(|| AppError::NotFound(RESOURCE.into()))
    }

    /// Creates a project from an already-gated request
    pub async fn create_project(&self, request: NewProject) -> Result<Project, AppError> {
        let project = Project::new(request);
        project.check_schema(self.image_url_policy)?;

        self.project_repo.insert_project(&project).await?;
        tracing::info!(project_id = %project.id, "project created");

        Ok(project)
    }

    /// Applies a partial update; the merged document is re-validated before it is stored
    pub async fn update_project(&self, id: &str, patch: ProjectPatch) -> Result<Project, AppError> {
        let valid_id = valid_object_id(id)?;

        let mut project = self.project_repo
            .get_project_by_id(&valid_id)
            .await?
            .ok_or_else(|| AppError::NotFound(RESOURCE.into()))?;

        project.apply(patch);
        project.check_schema(self.image_url_policy)?;

        self.project_repo
            .replace_project(&project)
            .await?
            .ok_or_else(|| AppError::NotFound(RESOURCE.into()))
    }

    /// Deletes a project permanently
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_object_id(id)?;

        match self.project_repo.delete_project(&valid_id).await? {
            true => {
                tracing::info!(project_id = %valid_id, "project deleted");
                Ok(())
            }
            false => Err(AppError::NotFound(RESOURCE.into())),
        }
    }
}
