pub mod cli;
mod commands;
pub mod github;
pub mod prompt;
pub mod telemetry;
pub mod templates;

pub use commands::init;
pub use github::{CreatedRepository, GithubClient, RepositoryHost, RepositoryRequest};
pub use prompt::Visibility;
