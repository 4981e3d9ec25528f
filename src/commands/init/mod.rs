use std::{ffi::OsString, path::PathBuf};

use owo_colors::{OwoColorize, Stream};

use crate::{
    github::{CreatedRepository, GithubClient, RepositoryHost, RepositoryRequest},
    prompt::Visibility,
    telemetry::{RemoteCreationStatus, log_remote_creation_attempt},
    templates::{self, TemplateSource},
};

#[derive(Debug)]
pub struct InitCommand<H = GithubClient> {
    target_dir: PathBuf,
    templates: TemplateSource,
    name: String,
    visibility: Visibility,
    host: H,
}

impl InitCommand {
    pub fn new(
        target_dir: PathBuf,
        templates: TemplateSource,
        name: String,
        visibility: Visibility,
        api_url: &str,
        token: OsString,
    ) -> Self {
        let host = GithubClient::new(api_url, token);
        Self::with_host(target_dir, templates, name, visibility, host)
    }
}

impl<H> InitCommand<H>
where
    H: RepositoryHost,
{
    pub fn with_host(
        target_dir: PathBuf,
        templates: TemplateSource,
        name: String,
        visibility: Visibility,
        host: H,
    ) -> Self {
        Self {
            target_dir,
            templates,
            name,
            visibility,
            host,
        }
    }

    /// Writes `.gitignore`, then `README.md`, then creates the remote. A failing
    /// stage stops the sequence but leaves earlier output in place.
    pub fn execute(&mut self) -> color_eyre::Result<CreatedRepository> {
        templates::install_gitignore(&self.templates, &self.target_dir)?;
        print_done(&format!("{} generated.", templates::GITIGNORE_OUTPUT));

        templates::write_readme(&self.templates, &self.target_dir, &self.name)?;
        print_done(&format!("{} generated.", templates::README_OUTPUT));

        let created = self.create_remote()?;
        let clone_url = format_with_color(&created.clone_url, |text| {
            format!("{}", text.blue().underline())
        });
        print_done(&format!("Repository created: {clone_url}"));

        let finished = format_with_color(
            "Done! Your new GitHub repository is ready.",
            |text| format!("{}", text.green().bold()),
        );
        println!("🎉 {finished}");

        Ok(created)
    }

    fn create_remote(&mut self) -> color_eyre::Result<CreatedRepository> {
        let request = RepositoryRequest {
            name: self.name.clone(),
            visibility: self.visibility,
        };

        match self.host.create_repository(&request) {
            Ok(created) => {
                log_remote_creation_attempt(
                    &self.name,
                    self.visibility,
                    RemoteCreationStatus::Created,
                    &created.full_name,
                );
                Ok(created)
            }
            Err(err) => {
                log_remote_creation_attempt(
                    &self.name,
                    self.visibility,
                    RemoteCreationStatus::Failed,
                    &err.to_string(),
                );
                Err(err)
            }
        }
    }
}

fn print_done(message: &str) {
    let glyph = format_with_color("✅", |text| format!("{}", text.green()));
    println!("{glyph} {message}");
}

fn format_with_color(value: &str, paint: impl Fn(&str) -> String) -> String {
    value
        .if_supports_color(Stream::Stdout, |text| paint(text))
        .to_string()
}
