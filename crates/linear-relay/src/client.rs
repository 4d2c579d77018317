//! GraphQL client for Linear API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::LinearError;
use crate::models::{Connection, Issue, PageInfo};

/// Per-request timeout for Linear API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues requested per page.
pub const PAGE_SIZE: usize = 100;

/// Upper bound on pages fetched by one pagination loop.
pub const MAX_PAGES: usize = 100;

const OPEN_ISSUES_QUERY: &str = r#"
    query OpenIssues($first: Int!, $cursor: String) {
        issues(
            filter: { state: { type: { nin: ["completed", "canceled"] } } }
            first: $first
            after: $cursor
            orderBy: updatedAt
        ) {
            nodes {
                id
                identifier
                title
                priority
                priorityLabel
                url
                createdAt
                updatedAt
                state {
                    id
                    name
                    color
                    type
                }
                assignee {
                    id
                    name
                    displayName
                    email
                }
                team {
                    id
                    name
                    key
                }
                labels {
                    nodes {
                        id
                        name
                        color
                    }
                }
            }
            pageInfo {
                hasNextPage
                endCursor
            }
        }
    }
"#;

/// Linear GraphQL client
#[derive(Debug, Clone)]
pub struct LinearClient {
    client: reqwest::Client,
    api_url: String,
}

/// GraphQL request body
#[derive(Debug, Serialize)]
struct GraphQLRequest<V: Serialize> {
    query: &'static str,
    variables: V,
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error
#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

/// One page of the open-issues query.
#[derive(Debug, Deserialize)]
struct IssuesPage {
    issues: IssueConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueConnection {
    #[serde(flatten)]
    connection: Connection<Issue>,
    page_info: PageInfo,
}

/// Variables for the open-issues query; the cursor is left out on the first page.
#[derive(Debug, Serialize)]
struct PageVariables<'a> {
    first: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
}

impl LinearClient {
    /// Create a new Linear client.
    ///
    /// Personal API keys (`lin_api_*`) are sent as-is; anything else is
    /// treated as an OAuth token and gets the `Bearer` prefix.
    pub fn new(api_key: &str, api_url: impl Into<String>) -> Result<Self, LinearError> {
        let mut headers = HeaderMap::new();

        let auth_value = if api_key.starts_with("lin_api_") {
            api_key.to_string()
        } else {
            format!("Bearer {api_key}")
        };

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|_| LinearError::InvalidApiKey)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Execute a GraphQL query
    async fn execute<V: Serialize, R: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: V,
    ) -> Result<R, LinearError> {
        let request = GraphQLRequest { query, variables };

        let response = self.client.post(&self.api_url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LinearError::Status { status, body });
        }

        let gql_response: GraphQLResponse<R> = response.json().await?;

        if let Some(errors) = gql_response.errors.filter(|e| !e.is_empty()) {
            let error_messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
            return Err(LinearError::GraphQl(error_messages.join(", ")));
        }

        gql_response.data.ok_or(LinearError::MissingData)
    }

    /// Fetch every issue whose state is neither completed nor canceled.
    ///
    /// Follows `pageInfo.endCursor` until Linear reports no further pages,
    /// giving up after [`MAX_PAGES`].
    #[instrument(skip(self))]
    pub async fn fetch_open_issues(&self) -> Result<Vec<Issue>, LinearError> {
        let mut issues = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let response: IssuesPage = self
                .execute(
                    OPEN_ISSUES_QUERY,
                    PageVariables {
                        first: PAGE_SIZE,
                        cursor: cursor.as_deref(),
                    },
                )
                .await?;

            let IssueConnection {
                connection,
                page_info,
            } = response.issues;

            debug!(
                page,
                count = connection.nodes.len(),
                has_next_page = page_info.has_next_page,
                "Fetched issues page"
            );
            issues.extend(connection.nodes);

            if !page_info.has_next_page {
                info!(pages = page, total = issues.len(), "Fetched open issues");
                return Ok(issues);
            }

            cursor = Some(page_info.end_cursor.ok_or(LinearError::MissingCursor)?);
        }

        Err(LinearError::PageLimit(MAX_PAGES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    fn issue_json(identifier: &str) -> serde_json::Value {
        json!({
            "id": format!("id-{identifier}"),
            "identifier": identifier,
            "title": format!("Issue {identifier}"),
            "priority": 3,
            "priorityLabel": "Medium",
            "url": format!("https://linear.app/acme/issue/{identifier}"),
            "createdAt": "2026-10-01T08:00:00.000Z",
            "updatedAt": "2026-10-02T08:00:00.000Z",
            "state": {"id": "s1", "name": "Todo", "color": "#fff", "type": "unstarted"},
            "assignee": null,
            "team": {"id": "t1", "name": "Engineering", "key": "ENG"},
            "labels": {"nodes": []}
        })
    }

    fn page(identifiers: &[&str], end_cursor: Option<&str>) -> serde_json::Value {
        json!({
            "data": {
                "issues": {
                    "nodes": identifiers.iter().map(|id| issue_json(id)).collect::<Vec<_>>(),
                    "pageInfo": {
                        "hasNextPage": end_cursor.is_some(),
                        "endCursor": end_cursor
                    }
                }
            }
        })
    }

    /// Matches requests that carry no cursor variable.
    struct FirstPage;

    impl Match for FirstPage {
        fn matches(&self, request: &Request) -> bool {
            serde_json::from_slice::<serde_json::Value>(&request.body)
                .map(|body| body["variables"].get("cursor").is_none())
                .unwrap_or(false)
        }
    }

    #[test]
    fn test_client_creation() {
        assert!(LinearClient::new("lin_api_test", "http://localhost").is_ok());
        assert!(LinearClient::new("oauth-token", "http://localhost").is_ok());
        assert!(matches!(
            LinearClient::new("bad\nkey", "http://localhost"),
            Err(LinearError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_first_page_omits_cursor() {
        let json = serde_json::to_value(PageVariables {
            first: PAGE_SIZE,
            cursor: None,
        })
        .unwrap();
        assert_eq!(json, json!({ "first": 100 }));

        let json = serde_json::to_value(PageVariables {
            first: PAGE_SIZE,
            cursor: Some("abc"),
        })
        .unwrap();
        assert_eq!(json, json!({ "first": 100, "cursor": "abc" }));
    }

    #[tokio::test]
    async fn test_fetch_follows_cursors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "lin_api_test"))
            .and(FirstPage)
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["ENG-1", "ENG-2"], Some("c1"))))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "variables": { "cursor": "c1" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["ENG-3"], Some("c2"))))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "variables": { "cursor": "c2" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["ENG-4"], None)))
            .expect(1)
            .mount(&server)
            .await;

        let client = LinearClient::new("lin_api_test", format!("{}/graphql", server.uri())).unwrap();
        let issues = client.fetch_open_issues().await.unwrap();

        let ids: Vec<&str> = issues.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(ids, vec!["ENG-1", "ENG-2", "ENG-3", "ENG-4"]);
    }

    #[tokio::test]
    async fn test_oauth_token_uses_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer oauth-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&[], None)))
            .expect(1)
            .mount(&server)
            .await;

        let client = LinearClient::new("oauth-token", server.uri()).unwrap();
        assert!(client.fetch_open_issues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_page_cap() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["ENG-1"], Some("same"))))
            .mount(&server)
            .await;

        let client = LinearClient::new("lin_api_test", server.uri()).unwrap();
        let err = client.fetch_open_issues().await.unwrap_err();
        assert!(matches!(err, LinearError::PageLimit(MAX_PAGES)));
    }

    #[tokio::test]
    async fn test_missing_cursor() {
        let server = MockServer::start().await;
        let body = json!({
            "data": {
                "issues": {
                    "nodes": [],
                    "pageInfo": { "hasNextPage": true, "endCursor": null }
                }
            }
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = LinearClient::new("lin_api_test", server.uri()).unwrap();
        assert!(matches!(
            client.fetch_open_issues().await,
            Err(LinearError::MissingCursor)
        ));
    }

    #[tokio::test]
    async fn test_graphql_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Authentication required" }]
            })))
            .mount(&server)
            .await;

        let client = LinearClient::new("lin_api_test", server.uri()).unwrap();
        let err = client.fetch_open_issues().await.unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Authentication required");
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = LinearClient::new("lin_api_test", server.uri()).unwrap();
        match client.fetch_open_issues().await.unwrap_err() {
            LinearError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
