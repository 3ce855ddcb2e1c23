//! Endpoint: the immutable description of one HTTP call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{HttpMethod, QueryParams};
use crate::error::{DomainError, DomainResult};

/// What travels with the request besides the path.
///
/// Query parameters and a JSON body are mutually exclusive per call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    /// Nothing beyond method and path.
    #[default]
    None,
    /// URL-encoded query parameters (GET/DELETE).
    Query(QueryParams),
    /// JSON object body (POST/PUT).
    Json(Map<String, Value>),
}

/// A described HTTP call relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EndpointDef", into = "EndpointDef")]
pub struct Endpoint {
    method: HttpMethod,
    path: String,
    payload: Payload,
}

impl Endpoint {
    /// Creates an endpoint without payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEndpoint` if the path is empty or is an absolute URL.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> DomainResult<Self> {
        let path = path.into();
        let trimmed = path.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(DomainError::InvalidEndpoint(
                "endpoint path must not be empty".to_string(),
            ));
        }
        if trimmed.contains("://") {
            return Err(DomainError::InvalidEndpoint(format!(
                "endpoint path must be relative to the base URL, got `{trimmed}`"
            )));
        }

        Ok(Self {
            method,
            path: trimmed.to_string(),
            payload: Payload::None,
        })
    }

    /// Shortcut for a GET endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::new`].
    pub fn get(path: impl Into<String>) -> DomainResult<Self> {
        Self::new(HttpMethod::Get, path)
    }

    /// Shortcut for a POST endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::new`].
    pub fn post(path: impl Into<String>) -> DomainResult<Self> {
        Self::new(HttpMethod::Post, path)
    }

    /// Shortcut for a PUT endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::new`].
    pub fn put(path: impl Into<String>) -> DomainResult<Self> {
        Self::new(HttpMethod::Put, path)
    }

    /// Shortcut for a DELETE endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::new`].
    pub fn delete(path: impl Into<String>) -> DomainResult<Self> {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attaches query parameters.
    ///
    /// # Errors
    ///
    /// Fails if the method does not take a query or a JSON body is already set.
    pub fn with_query(mut self, params: QueryParams) -> DomainResult<Self> {
        if !self.method.has_query() {
            return Err(DomainError::InvalidEndpoint(format!(
                "{} {} cannot carry query parameters",
                self.method, self.path
            )));
        }
        if matches!(self.payload, Payload::Json(_)) {
            return Err(DomainError::InvalidEndpoint(format!(
                "{} {} already has a JSON body",
                self.method, self.path
            )));
        }
        self.payload = Payload::Query(params);
        Ok(self)
    }

    /// Attaches a JSON object body.
    ///
    /// # Errors
    ///
    /// Fails if the method does not take a body or query parameters are already set.
    pub fn with_json(mut self, body: Map<String, Value>) -> DomainResult<Self> {
        if !self.method.has_body() {
            return Err(DomainError::InvalidEndpoint(format!(
                "{} {} cannot carry a JSON body",
                self.method, self.path
            )));
        }
        if matches!(self.payload, Payload::Query(_)) {
            return Err(DomainError::InvalidEndpoint(format!(
                "{} {} already has query parameters",
                self.method, self.path
            )));
        }
        self.payload = Payload::Json(body);
        Ok(self)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path relative to the base URL, without a leading slash.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Attached payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Query parameters, if any.
    #[must_use]
    pub const fn query(&self) -> Option<&QueryParams> {
        match &self.payload {
            Payload::Query(params) => Some(params),
            _ => None,
        }
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn json_body(&self) -> Option<&Map<String, Value>> {
        match &self.payload {
            Payload::Json(body) => Some(body),
            _ => None,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} /{}", self.method, self.path)
    }
}

/// Wire shape of an endpoint in scenario files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EndpointDef {
    method: HttpMethod,
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<QueryParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    json: Option<Map<String, Value>>,
}

impl TryFrom<EndpointDef> for Endpoint {
    type Error = DomainError;

    fn try_from(def: EndpointDef) -> DomainResult<Self> {
        let endpoint = Self::new(def.method, def.path)?;
        match (def.query, def.json) {
            (Some(_), Some(_)) => Err(DomainError::InvalidEndpoint(format!(
                "{endpoint} declares both query parameters and a JSON body"
            ))),
            (Some(query), None) => endpoint.with_query(query),
            (None, Some(json)) => endpoint.with_json(json),
            (None, None) => Ok(endpoint),
        }
    }
}

impl From<Endpoint> for EndpointDef {
    fn from(endpoint: Endpoint) -> Self {
        let (query, json) = match endpoint.payload {
            Payload::None => (None, None),
            Payload::Query(q) => (Some(q), None),
            Payload::Json(j) => (None, Some(j)),
        };
        Self {
            method: endpoint.method,
            path: endpoint.path,
            query,
            json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            Endpoint::get("   "),
            Err(DomainError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            Endpoint::get("/"),
            Err(DomainError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_leading_slash_stripped() {
        let endpoint = Endpoint::get("/productsList").unwrap();
        assert_eq!(endpoint.path(), "productsList");
        assert_eq!(endpoint.to_string(), "GET /productsList");
    }

    #[test]
    fn test_absolute_url_rejected() {
        assert!(Endpoint::get("https://example.com/api").is_err());
    }

    #[test]
    fn test_query_only_on_get_and_delete() {
        let params = QueryParams::new().with("email", "john@example.com");
        assert!(Endpoint::get("getUserDetailByEmail")
            .unwrap()
            .with_query(params.clone())
            .is_ok());
        assert!(Endpoint::delete("deleteAccount")
            .unwrap()
            .with_query(params.clone())
            .is_ok());
        assert!(Endpoint::post("verifyLogin")
            .unwrap()
            .with_query(params)
            .is_err());
    }

    #[test]
    fn test_json_only_on_post_and_put() {
        let body = object(json!({"search_product": "top"}));
        let endpoint = Endpoint::post("searchProduct")
            .unwrap()
            .with_json(body.clone())
            .unwrap();
        assert_eq!(endpoint.json_body(), Some(&body));
        assert!(endpoint.query().is_none());
        assert!(Endpoint::get("searchProduct").unwrap().with_json(body).is_err());
    }

    #[test]
    fn test_deserialize_rejects_both_payloads() {
        let yaml = r"
method: DELETE
path: verifyLogin
query: { email: a@b.c }
json: { email: a@b.c }
";
        let result: Result<Endpoint, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_query_endpoint() {
        let yaml = r"
method: GET
path: getUserDetailByEmail
query:
  email: john@example.com
";
        let endpoint: Endpoint = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(endpoint.method(), HttpMethod::Get);
        let pairs: Vec<_> = endpoint.query().unwrap().pairs().collect();
        assert_eq!(pairs, vec![("email", "john@example.com")]);
    }
}
