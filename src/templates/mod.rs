use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{self, WrapErr};

pub const REPO_NAME_PLACEHOLDER: &str = "{{REPO_NAME}}";
pub const GITIGNORE_TEMPLATE_FILE: &str = "gitignore_template.txt";
pub const README_TEMPLATE_FILE: &str = "readme_template.md";
pub const GITIGNORE_OUTPUT: &str = ".gitignore";
pub const README_OUTPUT: &str = "README.md";

pub(crate) const BUNDLED_GITIGNORE: &[u8] =
    include_bytes!("../../templates/gitignore_template.txt");
pub(crate) const BUNDLED_README: &str = include_str!("../../templates/readme_template.md");

/// Where the `.gitignore` and README templates are read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSource {
    /// Templates compiled into the binary.
    #[default]
    Bundled,
    /// A directory holding `gitignore_template.txt` and `readme_template.md`.
    Directory(PathBuf),
}

impl TemplateSource {
    pub fn gitignore(&self) -> color_eyre::Result<Cow<'static, [u8]>> {
        match self {
            TemplateSource::Bundled => Ok(Cow::Borrowed(BUNDLED_GITIGNORE)),
            TemplateSource::Directory(dir) => {
                let path = dir.join(GITIGNORE_TEMPLATE_FILE);
                fs::read(&path)
                    .map(Cow::Owned)
                    .wrap_err_with(|| eyre::eyre!("failed to read `{}`", path.display()))
            }
        }
    }

    pub fn readme(&self) -> color_eyre::Result<Cow<'static, str>> {
        match self {
            TemplateSource::Bundled => Ok(Cow::Borrowed(BUNDLED_README)),
            TemplateSource::Directory(dir) => {
                let path = dir.join(README_TEMPLATE_FILE);
                fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .wrap_err_with(|| eyre::eyre!("failed to read `{}`", path.display()))
            }
        }
    }
}

/// Copies the `.gitignore` template into `target_dir`, replacing any existing file.
pub fn install_gitignore(
    source: &TemplateSource,
    target_dir: &Path,
) -> color_eyre::Result<PathBuf> {
    let contents = source.gitignore()?;
    let destination = target_dir.join(GITIGNORE_OUTPUT);
    fs::write(&destination, &*contents)
        .wrap_err_with(|| eyre::eyre!("failed to write `{}`", destination.display()))?;
    Ok(destination)
}

/// Renders the README template for `repo_name` into `target_dir`, replacing any existing file.
pub fn write_readme(
    source: &TemplateSource,
    target_dir: &Path,
    repo_name: &str,
) -> color_eyre::Result<PathBuf> {
    let template = source.readme()?;
    let destination = target_dir.join(README_OUTPUT);
    fs::write(&destination, render_readme(&template, repo_name))
        .wrap_err_with(|| eyre::eyre!("failed to write `{}`", destination.display()))?;
    Ok(destination)
}

// Single pass: placeholders introduced by `repo_name` itself stay as-is.
pub fn render_readme(template: &str, repo_name: &str) -> String {
    template.replace(REPO_NAME_PLACEHOLDER, repo_name)
}
