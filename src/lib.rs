mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{db, utils};

use repositories::{contact::ContactRepository, project::ProjectRepository};
use settings::AppConfig;
use shared_repos::SharedRepositories;
use use_cases::{contact::ContactHandler, project::ProjectHandler};
use validation::ValidationRules;

pub struct AppState {
    pub project_handler: AppProjectHandler,
    pub contact_handler: AppContactHandler,
    pub rules: ValidationRules,
    pub admin_token: Option<String>,
}

pub type AppProjectHandler = ProjectHandler<dyn ProjectRepository>;
pub type AppContactHandler = ContactHandler<dyn ContactRepository>;

impl AppState {
    pub fn new(config: &AppConfig, repos: SharedRepositories) -> Self {
        let project_handler = ProjectHandler::new(repos.project_repo, config.image_url_policy);
        let contact_handler = ContactHandler::new(repos.contact_repo);

        AppState {
            project_handler,
            contact_handler,
            rules: ValidationRules::new(config.image_url_policy),
            admin_token: config.admin_token.clone(),
        }
    }
}
