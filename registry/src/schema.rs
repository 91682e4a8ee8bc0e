use schemars::JsonSchema;
use serde_json::{Map, Value, json};
use snafu::ResultExt;

use crate::Result;
use crate::error::SchemaSerializeSnafu;

pub const COMPONENTS_PREFIX: &str = "#/components/schemas/";

const DEFS_PREFIX: &str = "#/$defs/";

/// Reference to a shape used by a path descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaRef {
    /// A schema registered by name
    Named(String),

    /// An array whose items follow the inner shape
    Array(Box<SchemaRef>),

    /// An anonymous shape, rendered as is
    Inline(Value),
}

impl SchemaRef {
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }

    pub fn array_of(items: SchemaRef) -> Self {
        Self::Array(Box::new(items))
    }

    pub fn string() -> Self {
        Self::Inline(json!({ "type": "string" }))
    }

    /// Renders the shape as it appears inside an OpenAPI document
    pub fn to_json(&self) -> Value {
        match self {
            Self::Named(name) => json!({ "$ref": format!("{}{}", COMPONENTS_PREFIX, name) }),
            Self::Array(items) => json!({ "type": "array", "items": items.to_json() }),
            Self::Inline(value) => value.clone(),
        }
    }

    /// Names of the registered schemas this shape depends on
    pub fn referenced_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_refs(&self.to_json(), &mut names);
        names
    }
}

/// Generates the schema of `T`, split into its root and the subschemas it
/// refers to. References are rewritten to point at the components section.
pub(crate) fn generate<T: JsonSchema>(name: &str) -> Result<(Value, Map<String, Value>)> {
    let schema = schemars::schema_for!(T);
    let mut root = serde_json::to_value(&schema).context(SchemaSerializeSnafu {
        name: name.to_string(),
    })?;

    let mut defs = Map::new();
    if let Value::Object(obj) = &mut root {
        obj.remove("$schema");
        if let Some(Value::Object(found)) = obj.remove("$defs") {
            defs = found;
        }
    }

    rewrite_refs(&mut root);
    for def in defs.values_mut() {
        rewrite_refs(def);
    }

    Ok((root, defs))
}

fn rewrite_refs(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(target)) = obj.get_mut("$ref") {
                let rewritten = target
                    .strip_prefix(DEFS_PREFIX)
                    .map(|def_name| format!("{}{}", COMPONENTS_PREFIX, def_name));
                if let Some(rewritten) = rewritten {
                    *target = rewritten;
                }
            }
            for child in obj.values_mut() {
                rewrite_refs(child);
            }
        }
        Value::Array(items) => {
            for child in items.iter_mut() {
                rewrite_refs(child);
            }
        }
        _ => {}
    }
}

pub(crate) fn collect_refs(value: &Value, names: &mut Vec<String>) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(target)) = obj.get("$ref") {
                if let Some(name) = target.strip_prefix(COMPONENTS_PREFIX) {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
            }
            for child in obj.values() {
                collect_refs(child, names);
            }
        }
        Value::Array(items) => {
            for child in items.iter() {
                collect_refs(child, names);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Tag {
        label: String,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Note {
        text: String,
        tag: Tag,
    }

    #[test]
    fn test_schema_ref_json() {
        let named = SchemaRef::named("Note");
        assert_eq!(named.to_json(), json!({ "$ref": "#/components/schemas/Note" }));

        let list = SchemaRef::array_of(SchemaRef::named("Note"));
        assert_eq!(
            list.to_json(),
            json!({
                "type": "array",
                "items": { "$ref": "#/components/schemas/Note" }
            })
        );
        assert_eq!(list.referenced_names(), vec!["Note".to_string()]);
        assert!(SchemaRef::string().referenced_names().is_empty());
    }

    #[test]
    fn test_generate_lifts_defs() {
        let (root, defs) = generate::<Note>("Note").unwrap();
        let obj = root.as_object().unwrap();
        assert!(!obj.contains_key("$schema"));
        assert!(!obj.contains_key("$defs"));
        assert_eq!(
            root["properties"]["tag"]["$ref"],
            "#/components/schemas/Tag"
        );
        assert!(defs.contains_key("Tag"));
    }
}
