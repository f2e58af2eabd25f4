//! Blocking GitHub GraphQL client.
//!
//! One POST per page to `https://api.github.com/graphql`, bearer-authenticated.
//! Request encoding and response decoding are plain functions so they can be
//! exercised without a network.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use starsync_core::{Secret, StarRecord};

use crate::error::FetchError;
use crate::fetch::{StarPage, StarPageSource, PAGE_SIZE};

pub const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

const STARRED_QUERY: &str = "query($login: String!, $first: Int!, $after: String) { \
user(login: $login) { \
starredRepositories(first: $first, after: $after) { \
pageInfo { hasNextPage endCursor } \
edges { node { name url description } } } } }";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    query: &'static str,
    variables: StarredVariables<'a>,
}

#[derive(Debug, Serialize)]
struct StarredVariables<'a> {
    login: &'a str,
    first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<StarredData>,
    #[serde(default)]
    errors: Vec<GraphQlMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StarredData {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    starred_repositories: StarredConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StarredConnection {
    page_info: PageInfo,
    #[serde(default)]
    edges: Vec<StarEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StarEdge {
    node: StarRecord,
}

/// Build the request body for one page of `login`'s stars.
pub(crate) fn starred_request<'a>(login: &'a str, after: Option<&'a str>) -> GraphQlRequest<'a> {
    GraphQlRequest {
        query: STARRED_QUERY,
        variables: StarredVariables {
            login,
            first: PAGE_SIZE,
            after,
        },
    }
}

/// Decode a 200 response body into a [`StarPage`].
pub(crate) fn decode_page(login: &str, body: &str) -> Result<StarPage, FetchError> {
    let response: GraphQlResponse = serde_json::from_str(body)?;
    if !response.errors.is_empty() {
        return Err(FetchError::GraphQl(
            response.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    let user = response
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| FetchError::UserNotFound(login.to_string()))?;
    let connection = user.starred_repositories;
    Ok(StarPage {
        stars: connection.edges.into_iter().map(|e| e.node).collect(),
        has_next_page: connection.page_info.has_next_page,
        end_cursor: connection.page_info.end_cursor,
    })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Page source backed by the GitHub GraphQL API.
pub struct GitHubClient {
    agent: ureq::Agent,
    endpoint: String,
    token: Secret,
}

impl GitHubClient {
    pub fn new(token: Secret, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("starsync/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            endpoint: GRAPHQL_ENDPOINT.to_string(),
            token,
        }
    }

    /// Point the client at a different GraphQL endpoint (GitHub Enterprise).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl StarPageSource for GitHubClient {
    fn fetch_page(&self, login: &str, after: Option<&str>) -> Result<StarPage, FetchError> {
        let request = starred_request(login, after);
        tracing::debug!(user = login, after = ?after, "requesting star page");

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.token.expose()))
            .send_json(&request);

        let body = match response {
            Ok(resp) if resp.status() == 200 => resp
                .into_string()
                .map_err(|e| FetchError::Transport(e.to_string()))?,
            Ok(resp) => {
                let status = resp.status();
                return Err(FetchError::Status {
                    status,
                    query: serde_json::to_string(&request)?,
                    body: resp.into_string().unwrap_or_default(),
                });
            }
            Err(ureq::Error::Status(status, resp)) => {
                return Err(FetchError::Status {
                    status,
                    query: serde_json::to_string(&request)?,
                    body: resp.into_string().unwrap_or_default(),
                });
            }
            Err(ureq::Error::Transport(t)) => return Err(FetchError::Transport(t.to_string())),
        };

        decode_page(login, &body)
    }
}
