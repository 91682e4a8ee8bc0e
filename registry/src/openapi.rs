use serde_json::{Map, Value, json};

use crate::path::PathDoc;
use crate::registry::Registry;

pub const OPENAPI_VERSION: &str = "3.1.0";

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

impl Registry {
    /// Renders the registered paths and schemas as an OpenAPI document
    pub fn document(&self, info: &ApiInfo) -> Value {
        let mut paths: Map<String, Value> = Map::new();
        for doc in self.paths().iter() {
            let entry = paths
                .entry(doc.path.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(verbs) = entry {
                verbs.insert(doc.method.to_string(), operation(doc));
            }
        }

        let mut info_obj = Map::new();
        info_obj.insert("title".to_string(), json!(info.title));
        info_obj.insert("version".to_string(), json!(info.version));
        if let Some(description) = &info.description {
            info_obj.insert("description".to_string(), json!(description));
        }

        json!({
            "openapi": OPENAPI_VERSION,
            "info": info_obj,
            "paths": paths,
            "components": {
                "schemas": self.schemas(),
            },
        })
    }
}

fn json_content(schema: Value) -> Value {
    let mut content = Map::new();
    content.insert(JSON_CONTENT_TYPE.to_string(), json!({ "schema": schema }));
    Value::Object(content)
}

fn operation(doc: &PathDoc) -> Value {
    let mut op = Map::new();
    if let Some(id) = &doc.operation_id {
        op.insert("operationId".to_string(), json!(id));
    }
    op.insert("description".to_string(), json!(doc.description));
    op.insert("tags".to_string(), json!(doc.tags));

    if !doc.params.is_empty() {
        let params: Vec<Value> = doc
            .params
            .iter()
            .map(|p| {
                let mut param = json!({
                    "name": p.name,
                    "in": p.location.to_string(),
                    "required": p.required,
                    "schema": p.schema.to_json(),
                });
                if let Some(description) = &p.description {
                    param["description"] = json!(description);
                }
                param
            })
            .collect();
        op.insert("parameters".to_string(), Value::Array(params));
    }

    if let Some(body) = &doc.body {
        op.insert(
            "requestBody".to_string(),
            json!({
                "required": true,
                "content": json_content(body.to_json()),
            }),
        );
    }

    let mut responses = Map::new();
    for res in doc.responses.iter() {
        let mut response = json!({ "description": res.description });
        if let Some(schema) = &res.schema {
            response["content"] = json_content(schema.to_json());
        }
        responses.insert(res.status.to_string(), response);
    }
    op.insert("responses".to_string(), Value::Object(responses));

    Value::Object(op)
}
