/*!
Companion TypeScript declarations for a read document.

The output imports the `components` and `operations` types produced by an
OpenAPI-to-TypeScript tool from the configured module and adds:

- one alias per component schema,
- per operation, `Parameters`, `RequestBody`, one `ResponseNNN` tuple per
  numeric response code, their `Response` union and a handler function type,
- an `operations` constant listing routes, parameters and request bodies,
- a `schemas` constant holding the component schemas as one JSON schema
  document with the configured `$id`.
*/

use crate::{
    config::TypingsConfig,
    dom::OpenApiDocument,
    endpoints::{EndpointDiscovery, EndpointMetadata},
    error::OpenApiResult,
    specification::reference::SCHEMAS,
};
use serde_json::{json, Map, Value};

/// TypeScript declaration generator
pub struct TypingsGenerator {
    config: TypingsConfig,
    discovery: EndpointDiscovery,
}

impl TypingsGenerator {
    pub fn new(config: TypingsConfig) -> OpenApiResult<Self> {
        Ok(Self {
            config,
            discovery: EndpointDiscovery::new()?,
        })
    }

    pub fn config(&self) -> &TypingsConfig {
        &self.config
    }

    /// Render the declarations for `document`
    pub fn generate(&self, document: &OpenApiDocument) -> OpenApiResult<String> {
        let endpoints: Vec<_> = self
            .discovery
            .discover(document)?
            .into_iter()
            .filter(|endpoint| {
                if endpoint.operation_id.is_none() {
                    tracing::warn!(
                        path = %endpoint.path,
                        method = %endpoint.method,
                        "operation without operationId skipped"
                    );
                }
                endpoint.operation_id.is_some()
            })
            .collect();

        let schema_types = document
            .schemas()
            .map(|(name, _)| format!("export type {name} = comps['schemas']['{name}'];"))
            .collect::<Vec<_>>();

        let operation_types = endpoints
            .iter()
            .map(operation_types)
            .collect::<Vec<_>>();

        let operations = endpoints
            .iter()
            .map(|endpoint| self.operation_json(endpoint))
            .collect::<Vec<_>>();

        let mut schemas = Map::new();
        for (name, schema) in document.schemas() {
            let mut schema = schema.to_tree();
            rewrite_refs(&mut schema, "#/");
            schemas.insert(name.to_string(), schema);
        }
        schemas.insert("$id".to_string(), Value::String(self.config.schemas_id.clone()));

        let out = [
            format!(
                "import {{ components as comps, operations as ops }} from '{}';\n",
                self.config.types_module
            ),
            format!("{}\n", schema_types.join("\n")),
            format!(
                "{}\nexport const operations = {} as const;\n",
                operation_types.join("\n"),
                serde_json::to_string_pretty(&operations)?
            ),
            format!(
                "export const schemas = {} as const;\n",
                serde_json::to_string_pretty(&schemas)?
            ),
        ]
        .join("\n");

        tracing::debug!(
            schemas = schema_types.len(),
            operations = endpoints.len(),
            "typings generated"
        );
        Ok(out)
    }

    fn operation_json(&self, endpoint: &EndpointMetadata) -> Value {
        let parameters = endpoint
            .parameters
            .iter()
            .map(|parameter| {
                json!({
                    "name": parameter.name,
                    "in": parameter.source.as_str(),
                    "required": parameter.required,
                })
            })
            .collect::<Vec<_>>();

        let request_body = endpoint.request_body.as_ref().map(|body| {
            let mut schema = body.schema.clone().unwrap_or(Value::Null);
            rewrite_refs(&mut schema, &format!("{}#/", self.config.schemas_id));
            json!({"required": body.required, "schema": schema})
        });

        json!({
            "path": endpoint.route,
            "method": endpoint.method,
            "id": endpoint.operation_id,
            "parameters": parameters,
            "requestBody": request_body,
        })
    }
}

/// Type declarations of one operation, newline terminated
fn operation_types(endpoint: &EndpointMetadata) -> String {
    let id = endpoint.operation_id.as_deref().unwrap_or_default();
    let name = type_name(id);

    let sources = endpoint.parameter_sources();
    let parameters = if sources.is_empty() {
        "Record<PropertyKey, never>".to_string()
    } else {
        sources
            .iter()
            .map(|source| format!("Required<ops['{id}']['parameters']>['{}']", source.as_str()))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let request_body = match &endpoint.request_body {
        Some(body) => {
            let optional = if body.required { "" } else { " | undefined" };
            format!("ops['{id}']['requestBody']['content']['application/json']{optional}")
        }
        None => "null".to_string(),
    };

    let mut responses = Vec::new();
    let mut response_types = Vec::new();
    for response in &endpoint.responses {
        let Some(status) = response.status else {
            tracing::warn!(operation = id, code = %response.code, "non-numeric response skipped");
            continue;
        };
        let body = if response.content {
            format!(", ops['{id}']['responses']['{status}']['content']['application/json']")
        } else {
            String::new()
        };
        responses.push(format!("export type {name}Response{status} = [{status}{body}]"));
        response_types.push(format!("{name}Response{status}"));
    }
    let response_union = if response_types.is_empty() {
        "never".to_string()
    } else {
        response_types.join(" | ")
    };

    let mut lines = vec![
        format!("export type {name}Parameters = {parameters};"),
        format!("export type {name}RequestBody = {request_body};"),
    ];
    lines.extend(responses);
    lines.push(format!("export type {name}Response = {response_union};"));
    lines.push(format!(
        "export type {name} = (parameters: {name}Parameters, requestBody: {name}RequestBody) => {name}Response | Promise<{name}Response>"
    ));
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Operation id with its first letter upper-cased
fn type_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Point every `$ref` into component schemas at `prefix` instead
fn rewrite_refs(value: &mut Value, prefix: &str) {
    match value {
        Value::Object(fields) => {
            for (key, field) in fields.iter_mut() {
                match field {
                    Value::String(reference) if key == "$ref" => {
                        if let Some(name) = reference.strip_prefix(SCHEMAS) {
                            let rewritten = format!("{prefix}{name}");
                            *reference = rewritten;
                        }
                    }
                    _ => rewrite_refs(field, prefix),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| rewrite_refs(item, prefix)),
        _ => {}
    }
}
