//! Execute GraphQL queries against a WPGraphQL endpoint and drain its
//! cursor-paginated listings.
//!
//! A [`Client`] performs exactly one request/response cycle per call to
//! [`QueryExecutor::execute()`].  The [`paginate()`] and [`fetch_all()`]
//! functions drive any [`QueryExecutor`] across the pages of a listing
//! described by a [`Paginator`], accumulating the items in request order.
pub mod catalog;
mod pagination;
mod queries;
#[cfg(test)]
mod testutil;
mod types;
pub use crate::pagination::*;
pub use crate::queries::*;
pub use crate::types::*;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use std::io::Read;
use thiserror::Error;
use ureq::{Agent, AgentBuilder};

/// The endpoint queried when none is configured
pub static DEFAULT_ENDPOINT: &str = "https://foodfocusthailand.com/wp-cms/graphql";

/// The environment variable from which [`Client::from_env()`] reads the
/// endpoint URL
pub static ENDPOINT_ENV_VAR: &str = "WP_GRAPHQL_URL";

static USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_REPOSITORY"),
    ")",
);

/// A capability for performing a single GraphQL request
///
/// Implementations perform no retries and no caching; every call results in
/// exactly one request.
pub trait QueryExecutor {
    /// Send `query` with the given `variables` and return the `data` field of
    /// the response
    fn execute(&self, query: &Query, variables: JsonMap) -> Result<JsonMap, TransportError>;

    /// Like [`QueryExecutor::execute()`], but deserialize the response data
    /// into `T`
    fn fetch<T: DeserializeOwned>(
        &self,
        query: &Query,
        variables: JsonMap,
    ) -> Result<T, TransportError>
    where
        Self: Sized,
    {
        let data = self.execute(query, variables)?;
        decode_data(query, data)
    }
}

/// Deserialize the `data` of a response to `query`, logging on failure
pub(crate) fn decode_data<T: DeserializeOwned>(
    query: &Query,
    data: JsonMap,
) -> Result<T, TransportError> {
    serde_json::from_value(serde_json::Value::Object(data)).map_err(|e| {
        tracing::error!(
            operation = query.name(),
            error = %e,
            "Failed to deserialize GraphQL response data"
        );
        TransportError::Json(e)
    })
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn execute(&self, query: &Query, variables: JsonMap) -> Result<JsonMap, TransportError> {
        (**self).execute(query, variables)
    }
}

/// A client for a WPGraphQL endpoint
///
/// Cloning a `Client` is cheap; clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Agent,
    endpoint: String,
}

impl Client {
    /// Create a client for the GraphQL endpoint at the given URL
    pub fn new(endpoint: &str) -> Result<Client, BuildClientError> {
        let inner = AgentBuilder::new().user_agent(USER_AGENT).build();
        Client::with_agent(inner, endpoint)
    }

    /// Create a client that sends requests through a preconfigured [`Agent`]
    /// (e.g., one with custom timeouts)
    pub fn with_agent(agent: Agent, endpoint: &str) -> Result<Client, BuildClientError> {
        let endpoint = endpoint.trim();
        let valid = endpoint
            .split_once("://")
            .is_some_and(|(scheme, rest)| {
                (scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("http"))
                    && !rest.is_empty()
            });
        if !valid {
            return Err(BuildClientError::Endpoint(endpoint.to_owned()));
        }
        Ok(Client {
            inner: agent,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Create a client for the endpoint named by the `WP_GRAPHQL_URL`
    /// environment variable, falling back to [`DEFAULT_ENDPOINT`] if it is
    /// unset or empty
    pub fn from_env() -> Result<Client, BuildClientError> {
        let endpoint = std::env::var(ENDPOINT_ENV_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty());
        Client::new(endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&self, payload: &QueryPayload<'_>) -> Result<JsonMap, TransportError> {
        let r = match self.inner.post(&self.endpoint).send_json(payload) {
            Ok(r) => r,
            Err(ureq::Error::Status(status, _)) => return Err(TransportError::Status(status)),
            Err(e) => return Err(TransportError::Http(Box::new(e))),
        };
        let mut bytes = Vec::new();
        r.into_reader()
            .read_to_end(&mut bytes)
            .map_err(TransportError::Read)?;
        serde_json::from_slice::<Response>(&bytes)?
            .into_data()
            .map_err(Into::into)
    }
}

impl QueryExecutor for Client {
    fn execute(&self, query: &Query, variables: JsonMap) -> Result<JsonMap, TransportError> {
        let payload = QueryPayload {
            query: query.document(),
            operation_name: query.name(),
            variables: &variables,
        };
        self.send(&payload).inspect_err(|e| {
            tracing::error!(
                operation = query.name(),
                endpoint = %self.endpoint,
                error = %e,
                "GraphQL fetch error"
            );
        })
    }
}

#[derive(Debug, Error)]
pub enum BuildClientError {
    #[error("invalid GraphQL endpoint URL: {0:?}")]
    Endpoint(String),
}

/// An error performing a single GraphQL request
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to perform GraphQL request")]
    Http(#[source] Box<ureq::Error>),
    #[error("GraphQL endpoint returned HTTP status {0}")]
    Status(u16),
    #[error("failed to read GraphQL response")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize GraphQL response")]
    Json(#[from] serde_json::Error),
    #[error("GraphQL server returned error response")]
    GraphQL(#[from] GqlError),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryPayload<'a> {
    query: &'a str,
    operation_name: &'a str,
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    variables: &'a JsonMap,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct Response {
    // `data` is null when the whole operation failed
    #[serde(default)]
    data: Option<JsonMap>,
    #[serde(default)]
    errors: GqlError,
}

impl Response {
    fn into_data(self) -> Result<JsonMap, GqlError> {
        if self.errors.is_empty() {
            Ok(self.data.unwrap_or_default())
        } else {
            Err(self.errors)
        }
    }
}

/// The `errors` array of a GraphQL response
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct GqlError(Vec<GqlInnerError>);

impl GqlError {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.message.as_str())
    }
}

impl fmt::Display for GqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query errored:")?;
        let mut first = true;
        for e in &self.0 {
            if !std::mem::take(&mut first) {
                writeln!(f, "---")?;
            }
            if let Some(ref c) = e.extensions.category {
                writeln!(f, "    Category: {c}")?;
            }
            writeln!(f, "    Message: {}", e.message)?;
            if let Some(ref p) = e.path {
                write!(f, "    Path: ")?;
                for (i, seg) in p.iter().enumerate() {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{seg}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for GqlError {}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct GqlInnerError {
    message: String,
    #[serde(default)]
    path: Option<Vec<PathSegment>>,
    #[serde(default)]
    extensions: ErrorExtensions,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
struct ErrorExtensions {
    #[serde(default)]
    category: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
enum PathSegment {
    Field(String),
    Index(u64),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(s) => write!(f, "{s}"),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{capture_logs, serve_once};
    use assert_matches::assert_matches;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn response_with_data() {
        let r = serde_json::from_str::<Response>(
            r#"{"data": {"magazines": {"nodes": []}}, "extensions": {"debug": []}}"#,
        )
        .unwrap();
        let data = r.into_data().unwrap();
        assert_eq!(data.keys().collect::<Vec<_>>(), ["magazines"]);
    }

    #[test]
    fn response_with_null_data() {
        let r = serde_json::from_str::<Response>(r#"{"data": null}"#).unwrap();
        assert_eq!(r.into_data().unwrap(), JsonMap::new());
    }

    #[test]
    fn response_without_data() {
        let r = serde_json::from_str::<Response>("{}").unwrap();
        assert_eq!(r.into_data().unwrap(), JsonMap::new());
    }

    #[test]
    fn response_with_errors() {
        let r = serde_json::from_str::<Response>(
            r#"{
                "errors": [
                    {
                        "message": "Cannot query field \"magazinez\" on type \"RootQuery\".",
                        "extensions": {"category": "graphql"},
                        "locations": [{"line": 2, "column": 3}]
                    },
                    {
                        "message": "Internal server error",
                        "path": ["posts", "nodes", 0, "featuredImage"]
                    }
                ],
                "data": {"posts": null}
            }"#,
        )
        .unwrap();
        let e = r.into_data().unwrap_err();
        assert_eq!(
            e.messages().collect::<Vec<_>>(),
            [
                "Cannot query field \"magazinez\" on type \"RootQuery\".",
                "Internal server error"
            ]
        );
        assert_eq!(
            e.to_string(),
            indoc! {r#"
            Query errored:
                Category: graphql
                Message: Cannot query field "magazinez" on type "RootQuery".
            ---
                Message: Internal server error
                Path: posts.nodes.0.featuredImage
            "#}
        );
    }

    #[test]
    fn payload_serialization() {
        let variables = JsonMap::from_iter([
            ("first".into(), 100.into()),
            ("after".into(), serde_json::Value::Null),
        ]);
        let payload = QueryPayload {
            query: "query GetAllSeminars { seminars { nodes { slug } } }",
            operation_name: "GetAllSeminars",
            variables: &variables,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "query": "query GetAllSeminars { seminars { nodes { slug } } }",
                "operationName": "GetAllSeminars",
                "variables": {"first": 100, "after": null},
            })
        );
    }

    #[test]
    fn payload_without_variables() {
        let variables = JsonMap::new();
        let payload = QueryPayload {
            query: "query GetEventYears { eventYears { nodes { slug } } }",
            operation_name: "GetEventYears",
            variables: &variables,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "query": "query GetEventYears { eventYears { nodes { slug } } }",
                "operationName": "GetEventYears",
            })
        );
    }

    #[test]
    fn client_rejects_bad_endpoint() {
        for endpoint in [
            "foodfocusthailand.com/wp-cms/graphql",
            "ftp://foodfocusthailand.com/wp-cms/graphql",
            "https://",
        ] {
            assert_matches!(
                Client::new(endpoint),
                Err(BuildClientError::Endpoint(s)) if s == endpoint
            );
        }
    }

    #[test]
    fn client_accepts_endpoint() {
        let client = Client::new(" https://example.com/graphql ").unwrap();
        assert_eq!(client.endpoint(), "https://example.com/graphql");
    }

    #[test]
    fn client_accepts_uppercase_scheme() {
        let client = Client::new("HTTPS://example.com/graphql").unwrap();
        assert_eq!(client.endpoint(), "HTTPS://example.com/graphql");
        assert!(Client::new("Http://localhost:8080/graphql").is_ok());
    }

    #[test]
    fn unreachable_endpoint() {
        let client = Client::new("http://127.0.0.1:9/graphql").unwrap();
        let query = Query::new("GetEventYears", "{ eventYears { nodes { slug } } }");
        let r = client.execute(&query, JsonMap::new());
        assert_matches!(r, Err(TransportError::Http(_)));
    }

    static GET_EVENT_YEARS: Query = Query::new(
        "GetEventYears",
        "query GetEventYears { eventYears { nodes { slug } } }",
    );

    #[test]
    fn execute_returns_data() {
        let server = serve_once(
            "200 OK",
            r#"{"data": {"eventYears": {"nodes": [{"slug": "2025"}]}}}"#,
        );
        let client = Client::new(&server.url).unwrap();
        let variables = JsonMap::from_iter([("first".into(), 100.into())]);
        let data = client.execute(&GET_EVENT_YEARS, variables).unwrap();
        assert_eq!(
            serde_json::Value::Object(data),
            json!({"eventYears": {"nodes": [{"slug": "2025"}]}})
        );
        assert_eq!(
            server.request_body(),
            json!({
                "query": "query GetEventYears { eventYears { nodes { slug } } }",
                "operationName": "GetEventYears",
                "variables": {"first": 100},
            })
        );
    }

    #[test]
    fn execute_error_status() {
        let server = serve_once("500 Internal Server Error", "<h1>Error</h1>");
        let client = Client::new(&server.url).unwrap();
        let (r, logs) = capture_logs(|| client.execute(&GET_EVENT_YEARS, JsonMap::new()));
        assert_matches!(r, Err(TransportError::Status(500)));
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("GetEventYears"), "{logs}");
    }

    #[test]
    fn execute_graphql_errors() {
        let server = serve_once(
            "200 OK",
            r#"{"errors": [{"message": "Internal server error", "path": ["eventYears"]}], "data": null}"#,
        );
        let client = Client::new(&server.url).unwrap();
        match client.execute(&GET_EVENT_YEARS, JsonMap::new()) {
            Err(TransportError::GraphQL(e)) => {
                assert_eq!(e.messages().collect::<Vec<_>>(), ["Internal server error"]);
            }
            other => panic!("expected GraphQL error, got {other:?}"),
        }
    }

    #[test]
    fn execute_non_json_body() {
        let server = serve_once("200 OK", "<!DOCTYPE html><html></html>");
        let client = Client::new(&server.url).unwrap();
        let r = client.execute(&GET_EVENT_YEARS, JsonMap::new());
        assert_matches!(r, Err(TransportError::Json(_)));
    }

    #[test]
    fn fetch_logs_mismatched_data() {
        let server = serve_once("200 OK", r#"{"data": {"eventYears": "nope"}}"#);
        let client = Client::new(&server.url).unwrap();
        let (r, logs) = capture_logs(|| {
            client.fetch::<Singleton<Page<serde_json::Value>>>(&GET_EVENT_YEARS, JsonMap::new())
        });
        assert_matches!(r, Err(TransportError::Json(_)));
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("GetEventYears"), "{logs}");
        assert!(logs.contains("invalid type"), "{logs}");
    }
}
