use std::{
    ffi::{OsStr, OsString},
    fmt,
};

use color_eyre::eyre::{self, WrapErr};
use reqwest::{
    blocking::{Client, Response},
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};

use crate::prompt::Visibility;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("repo-init/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRequest {
    pub name: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRepository {
    pub full_name: String,
    pub clone_url: String,
    pub html_url: String,
}

/// Creates repositories under the account that owns the configured credential.
pub trait RepositoryHost {
    fn create_repository(
        &mut self,
        request: &RepositoryRequest,
    ) -> color_eyre::Result<CreatedRepository>;
}

#[derive(Debug, Deserialize)]
struct AuthenticatedUser {
    login: String,
}

#[derive(Debug, Serialize)]
struct CreateRepositoryBody<'a> {
    name: &'a str,
    private: bool,
}

/// Blocking client for the GitHub REST API. The credential is only checked and
/// turned into a request header when a repository is created.
pub struct GithubClient {
    api_url: String,
    token: OsString,
    http: Option<Client>,
}

impl fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    pub fn new(api_url: &str, token: impl Into<OsString>) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.into(),
            http: None,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn authenticated_login(&mut self) -> color_eyre::Result<String> {
        let url = format!("{}/user", self.api_url);
        let response = self
            .http()?
            .get(&url)
            .send()
            .wrap_err_with(|| eyre::eyre!("failed to send request to `{url}`"))?;
        let user: AuthenticatedUser = ensure_success(response, "resolving the authenticated user")?
            .json()
            .wrap_err("failed to parse authenticated user response")?;
        Ok(user.login)
    }

    fn http(&mut self) -> color_eyre::Result<&Client> {
        let http = match self.http.take() {
            Some(http) => http,
            None => build_http_client(&self.token)?,
        };
        Ok(&*self.http.insert(http))
    }
}

impl RepositoryHost for GithubClient {
    fn create_repository(
        &mut self,
        request: &RepositoryRequest,
    ) -> color_eyre::Result<CreatedRepository> {
        let login = self.authenticated_login()?;

        let url = format!("{}/user/repos", self.api_url);
        let body = CreateRepositoryBody {
            name: &request.name,
            private: request.visibility.is_private(),
        };
        let response = self
            .http()?
            .post(&url)
            .json(&body)
            .send()
            .wrap_err_with(|| eyre::eyre!("failed to send request to `{url}`"))?;

        let action = format!("creating repository `{}` for `{login}`", request.name);
        ensure_success(response, &action)?
            .json()
            .wrap_err("failed to parse created repository response")
    }
}

fn build_http_client(token: &OsStr) -> color_eyre::Result<Client> {
    let token = token
        .to_str()
        .ok_or_else(|| eyre::eyre!("GITHUB_TOKEN is not valid UTF-8"))?;
    let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .wrap_err("GITHUB_TOKEN contains characters that are not valid in a header")?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .wrap_err("failed to build HTTP client")
}

fn ensure_success(response: Response, action: &str) -> color_eyre::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let mut message = format!("GitHub returned {status} while {action}");
    let body = body.trim();
    if !body.is_empty() {
        message.push('\n');
        message.push_str(body);
    }

    Err(eyre::eyre!(message))
}
