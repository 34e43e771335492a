/*!
Endpoint extraction from read documents.

This module walks the paths of an [`OpenApiDocument`] and flattens every
operation into an [`EndpointMetadata`] record, merging path-level parameters
with the operation's own and following component references.
*/

use crate::{
    dom::OpenApiDocument,
    error::{OpenApiError, OpenApiResult},
    specification::{
        reference::{PARAMETERS, REQUEST_BODIES, RESPONSES},
        METHODS,
    },
};
use oas_spec::Instance;
use regex::Regex;
use serde_json::Value;

/// Media type whose schema describes a request body
const JSON_MEDIA_TYPE: &str = "application/json";

/// One operation of a document
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointMetadata {
    /// Path template as written, e.g. `/pets/{id}`
    pub path: String,
    /// Route pattern with `:name` parameters, e.g. `/pets/:id`
    pub route: String,
    /// Lowercase HTTP method
    pub method: String,
    pub operation_id: Option<String>,
    /// Path item parameters followed by the operation's own
    pub parameters: Vec<EndpointParameter>,
    pub request_body: Option<RequestBodyInfo>,
    /// Responses in document order
    pub responses: Vec<ResponseInfo>,
}

/// Parameter of an endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointParameter {
    pub name: String,
    pub source: ParameterSource,
    pub required: bool,
}

/// Location of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSource {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterSource {
    pub fn parse(location: &str) -> Option<Self> {
        match location {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

/// Request body of an endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyInfo {
    pub required: bool,
    /// JSON schema tree of the `application/json` content, if any
    pub schema: Option<Value>,
}

/// Response of an endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    /// Response key as written, e.g. `200` or `default`
    pub code: String,
    /// Numeric status, absent for `default` and range keys
    pub status: Option<u16>,
    /// Whether the response declares any content
    pub content: bool,
}

impl EndpointMetadata {
    /// Distinct parameter locations in first-seen order
    pub fn parameter_sources(&self) -> Vec<ParameterSource> {
        let mut sources = Vec::new();
        for parameter in &self.parameters {
            if !sources.contains(&parameter.source) {
                sources.push(parameter.source);
            }
        }
        sources
    }
}

/// Endpoint extraction service
pub struct EndpointDiscovery {
    /// Path parameter regex
    path_param_regex: Regex,
}

impl EndpointDiscovery {
    /// Create new endpoint discovery service
    pub fn new() -> OpenApiResult<Self> {
        Ok(Self {
            path_param_regex: Regex::new(r"\{([^}]+)\}").map_err(|e| {
                OpenApiError::generic(format!("Failed to compile regex: {}", e))
            })?,
        })
    }

    /// Extract every operation of `document`, paths in document order and
    /// methods in path item order
    pub fn discover(&self, document: &OpenApiDocument) -> OpenApiResult<Vec<EndpointMetadata>> {
        let mut endpoints = Vec::new();

        for (path, item) in document.paths() {
            for method in METHODS {
                let Some(operation) = item.child(method) else {
                    continue;
                };
                endpoints.push(self.endpoint(document, path, method, item, operation)?);
            }
        }

        tracing::debug!(endpoints = endpoints.len(), "endpoints discovered");
        Ok(endpoints)
    }

    fn endpoint(
        &self,
        document: &OpenApiDocument,
        path: &str,
        method: &str,
        item: &Instance,
        operation: &Instance,
    ) -> OpenApiResult<EndpointMetadata> {
        let parameters = item
            .children("parameters")
            .iter()
            .chain(operation.children("parameters"))
            .map(|parameter| Self::parameter(document, parameter))
            .collect::<OpenApiResult<Vec<_>>>()?;

        let request_body = operation
            .child("request_body")
            .map(|body| Self::request_body(document, body))
            .transpose()?;

        let mut responses = Vec::new();
        if let Some(entries) = operation.entries("responses") {
            for (code, response) in entries.iter() {
                let response = document.resolve(response, "responses", RESPONSES)?;
                responses.push(ResponseInfo {
                    code: code.to_string(),
                    status: code.parse().ok(),
                    content: response.is_set("content"),
                });
            }
        }

        Ok(EndpointMetadata {
            path: path.to_string(),
            route: self.route_pattern(path),
            method: method.to_string(),
            operation_id: operation.str("operation_id").map(str::to_string),
            parameters,
            request_body,
            responses,
        })
    }

    fn parameter(document: &OpenApiDocument, parameter: &Instance) -> OpenApiResult<EndpointParameter> {
        let parameter = document.resolve(parameter, "parameters", PARAMETERS)?;
        let name = parameter
            .str("name")
            .ok_or_else(|| OpenApiError::validation_error("parameter without a name"))?;
        let location = parameter.str("in").unwrap_or_default();
        let source = ParameterSource::parse(location).ok_or_else(|| {
            OpenApiError::validation_error(format!(
                "parameter `{}` has unknown location `{}`",
                name, location
            ))
        })?;

        Ok(EndpointParameter {
            name: name.to_string(),
            source,
            required: parameter.bool("required").unwrap_or(false),
        })
    }

    fn request_body(document: &OpenApiDocument, body: &Instance) -> OpenApiResult<RequestBodyInfo> {
        let body = document.resolve(body, "request_bodies", REQUEST_BODIES)?;
        let schema = body
            .entries("content")
            .and_then(|content| content.get(JSON_MEDIA_TYPE))
            .and_then(|media| media.child("schema"))
            .map(Instance::to_tree);

        Ok(RequestBodyInfo {
            required: body.bool("required").unwrap_or(false),
            schema,
        })
    }

    /// Extract path parameters from a path template
    pub fn extract_path_parameters(&self, path: &str) -> Vec<String> {
        self.path_param_regex
            .captures_iter(path)
            .filter_map(|caps| caps.get(1))
            .map(|param| param.as_str().to_string())
            .collect()
    }

    /// Rewrite `{name}` template segments to `:name`
    pub fn route_pattern(&self, path: &str) -> String {
        self.path_param_regex.replace_all(path, ":${1}").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{read_script, COMPANY_SCRIPT, PETS_SCRIPT};
    use serde_json::json;

    #[test]
    fn test_endpoint_discovery_creation() {
        let discovery = EndpointDiscovery::new().unwrap();
        assert!(discovery.path_param_regex.is_match("{id}"));
    }

    #[test]
    fn test_path_parameter_extraction() {
        let discovery = EndpointDiscovery::new().unwrap();

        let params = discovery.extract_path_parameters("/users/{id}/posts/{post_id}");
        assert_eq!(params, vec!["id", "post_id"]);
        assert!(discovery.extract_path_parameters("/users").is_empty());

        assert_eq!(
            discovery.route_pattern("/users/{id}/posts/{post_id}"),
            "/users/:id/posts/:post_id"
        );
    }

    #[test]
    fn test_discover_company_operations() {
        let document = read_script(COMPANY_SCRIPT);
        let endpoints = EndpointDiscovery::new().unwrap().discover(&document).unwrap();

        let ids = endpoints
            .iter()
            .map(|endpoint| (endpoint.method.as_str(), endpoint.operation_id.as_deref()))
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            [
                ("get", Some("listCompanies")),
                ("post", Some("createCompany")),
                ("get", Some("showCompany")),
                ("put", Some("updateCompany")),
                ("post", Some("addOwner")),
            ]
        );

        let update = &endpoints[3];
        assert_eq!(update.route, "/companies/:companyId");
        assert_eq!(
            update.parameters,
            vec![EndpointParameter {
                name: "companyId".to_string(),
                source: ParameterSource::Path,
                required: true,
            }]
        );
        let body = update.request_body.as_ref().unwrap();
        assert!(body.required);
        assert_eq!(body.schema, Some(json!({"$ref": "#/components/schemas/CompanyData"})));
        assert_eq!(
            update.responses.iter().map(|r| r.status).collect::<Vec<_>>(),
            [Some(200), Some(415), Some(404), Some(400)]
        );
        assert!(update.responses[0].content);
        assert!(!update.responses[1].content);

        let list = &endpoints[0];
        assert_eq!(list.parameter_sources(), [ParameterSource::Query]);
        assert!(!list.parameters[0].required);
        assert!(list.request_body.is_none());
    }

    #[test]
    fn test_optional_request_body() {
        let document = read_script(PETS_SCRIPT);
        let endpoints = EndpointDiscovery::new().unwrap().discover(&document).unwrap();
        let create = &endpoints[0];
        assert_eq!(create.operation_id.as_deref(), Some("create_pet"));
        assert!(!create.request_body.as_ref().unwrap().required);
    }

    #[test]
    fn test_references_are_followed() {
        let raw = json!({
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [{"$ref": "#/components/parameters/limit"}],
                        "responses": {"default": {"$ref": "#/components/responses/Error"}}
                    }
                }
            },
            "components": {
                "parameters": {"limit": {"name": "limit", "in": "query", "required": true}},
                "responses": {"Error": {
                    "description": "Unexpected error",
                    "content": {"application/json": {}}
                }}
            }
        });
        let document = OpenApiDocument::read(&raw).unwrap();
        let endpoints = EndpointDiscovery::new().unwrap().discover(&document).unwrap();

        assert_eq!(endpoints[0].parameters[0].name, "limit");
        assert!(endpoints[0].parameters[0].required);
        assert_eq!(
            endpoints[0].responses,
            vec![ResponseInfo {
                code: "default".to_string(),
                status: None,
                content: true,
            }]
        );
    }

    #[test]
    fn test_dangling_reference() {
        let raw = json!({"paths": {"/pets": {"get": {
            "parameters": [{"$ref": "#/components/parameters/missing"}]
        }}}});
        let document = OpenApiDocument::read(&raw).unwrap();
        let err = EndpointDiscovery::new().unwrap().discover(&document).unwrap_err();
        assert!(matches!(err, OpenApiError::Reference(_)));
    }
}
