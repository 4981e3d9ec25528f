use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use color_eyre::eyre::WrapErr;

use crate::{
    commands::init::InitCommand,
    github::DEFAULT_API_URL,
    prompt::{Ask, Prompter, TerminalPrompter},
    templates::TemplateSource,
};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const TEMPLATES_ENV: &str = "REPO_INIT_TEMPLATES";
pub const API_URL_ENV: &str = "REPO_INIT_GITHUB_API";

#[derive(Parser, Debug)]
#[command(
    name = "repo-init",
    version,
    about = "Seed .gitignore and README.md in the current directory and create the GitHub repository",
    long_about = None
)]
pub struct Cli {
    /// Directory containing `gitignore_template.txt` and `readme_template.md`
    /// (defaults to `$REPO_INIT_TEMPLATES`, then the bundled templates)
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,
    /// GitHub REST API base URL (defaults to `$REPO_INIT_GITHUB_API`, then api.github.com)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

impl Cli {
    fn template_source(&self) -> TemplateSource {
        self.templates
            .clone()
            .or_else(|| non_empty_env(TEMPLATES_ENV).map(PathBuf::from))
            .map(TemplateSource::Directory)
            .unwrap_or_default()
    }

    fn api_url(&self) -> String {
        self.api_url
            .clone()
            .or_else(|| non_empty_env(API_URL_ENV))
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
    }
}

pub fn run() -> color_eyre::Result<ExitCode> {
    let cli = Cli::parse();

    let Some(token) = std::env::var_os(TOKEN_ENV).filter(|token| !token.is_empty()) else {
        report_missing_token(&mut io::stderr().lock())?;
        return Ok(ExitCode::from(1));
    };

    let answers = if io::stdin().is_terminal() {
        TerminalPrompter.collect_answers()?
    } else {
        Prompter::new(io::stdin().lock(), io::stdout()).collect_answers()?
    };
    let target_dir = std::env::current_dir().wrap_err("failed to read current directory")?;

    let mut command = InitCommand::new(
        target_dir,
        cli.template_source(),
        answers.name,
        answers.visibility,
        &cli.api_url(),
        token,
    );
    command.execute()?;

    Ok(ExitCode::SUCCESS)
}

fn report_missing_token(out: &mut impl Write) -> color_eyre::Result<()> {
    writeln!(out, "❌ Error: the {TOKEN_ENV} environment variable is not set.")?;
    writeln!(
        out,
        "   Set it to a personal access token and run again, e.g. `export {TOKEN_ENV}=\"your_token_here\"`."
    )?;
    Ok(())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
