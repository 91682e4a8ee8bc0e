use std::collections::BTreeMap;

use jsonschema::{ValidationError, error::ValidationErrorKind};
use schemars::JsonSchema;
use serde_json::{Value, json};
use snafu::{OptionExt, ensure};

use crate::Result;
use crate::error::{
    DuplicatePathSnafu, DuplicateSchemaSnafu, InvalidSchemaSnafu, MissingResponsesSnafu,
    PathParamMismatchSnafu, SchemaNotFoundSnafu, UnknownPropertySnafu, UnknownSchemaSnafu,
    ValidationFailedSnafu,
};
use crate::path::{ParamLocation, PathDoc};
use crate::schema::{COMPONENTS_PREFIX, SchemaRef, generate};

/// Named schemas and path descriptors, populated once at startup and only
/// read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: BTreeMap<String, Value>,
    paths: Vec<PathDoc>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the schema generated from `T` under `name`.
    ///
    /// Subschemas referenced by `T` are registered under their own names,
    /// unless an identical schema is already there.
    pub fn register<T: JsonSchema>(&mut self, name: &str) -> Result<SchemaRef> {
        ensure!(
            !self.schemas.contains_key(name),
            DuplicateSchemaSnafu {
                name: name.to_string()
            }
        );

        let (schema, defs) = generate::<T>(name)?;

        // Conflicts are checked before anything is inserted
        for (def_name, def) in defs.iter() {
            if let Some(existing) = self.schemas.get(def_name) {
                ensure!(
                    existing == def,
                    DuplicateSchemaSnafu {
                        name: def_name.clone()
                    }
                );
            }
        }

        let mut added: Vec<String> = Vec::with_capacity(defs.len() + 1);
        for (def_name, def) in defs.into_iter() {
            if !self.schemas.contains_key(&def_name) {
                self.schemas.insert(def_name.clone(), def);
                added.push(def_name);
            }
        }

        self.schemas.insert(name.to_string(), schema);
        added.push(name.to_string());

        self.check_compiles(name, &added)?;
        Ok(SchemaRef::named(name))
    }

    /// Registers a composite shape under `name`, such as an array of an
    /// already registered schema.
    pub fn register_alias(&mut self, name: &str, target: SchemaRef) -> Result<SchemaRef> {
        ensure!(
            !self.schemas.contains_key(name),
            DuplicateSchemaSnafu {
                name: name.to_string()
            }
        );
        self.ensure_known(&target)?;

        self.schemas.insert(name.to_string(), target.to_json());
        self.check_compiles(name, &[name.to_string()])?;
        Ok(SchemaRef::named(name))
    }

    /// Shape of a single property of a registered object schema
    pub fn property(&self, name: &str, property: &str) -> Result<SchemaRef> {
        let schema = self.schemas.get(name).context(UnknownSchemaSnafu {
            name: name.to_string(),
        })?;

        let found = schema
            .get("properties")
            .and_then(|props| props.get(property))
            .context(UnknownPropertySnafu {
                name: name.to_string(),
                property: property.to_string(),
            })?;

        Ok(SchemaRef::Inline(found.clone()))
    }

    pub fn register_path(&mut self, doc: PathDoc) -> Result<()> {
        ensure!(
            !doc.responses.is_empty(),
            MissingResponsesSnafu {
                method: doc.method.to_string(),
                path: doc.path.clone(),
            }
        );

        let exists = self
            .paths
            .iter()
            .any(|p| p.method == doc.method && p.path == doc.path);
        ensure!(
            !exists,
            DuplicatePathSnafu {
                method: doc.method.to_string(),
                path: doc.path.clone(),
            }
        );

        let mut placeholders = doc.placeholders();
        let mut declared: Vec<String> = doc
            .params
            .iter()
            .filter(|p| p.location == ParamLocation::Path)
            .map(|p| p.name.clone())
            .collect();
        placeholders.sort();
        declared.sort();
        ensure!(
            placeholders == declared,
            PathParamMismatchSnafu {
                path: doc.path.clone(),
                placeholders: placeholders.join(", "),
                declared: declared.join(", "),
            }
        );

        for schema_ref in doc.schema_refs() {
            self.ensure_known(schema_ref)?;
        }

        self.paths.push(doc);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Registered schema names, sorted
    pub fn list(&self) -> Vec<&str> {
        self.schemas.keys().map(|k| k.as_str()).collect()
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Path descriptors in registration order
    pub fn paths(&self) -> &[PathDoc] {
        &self.paths
    }

    pub(crate) fn schemas(&self) -> &BTreeMap<String, Value> {
        &self.schemas
    }

    /// Validates a JSON value against a registered schema
    pub fn validate(&self, name: &str, instance: &Value) -> Result<()> {
        ensure!(
            self.schemas.contains_key(name),
            SchemaNotFoundSnafu {
                name: name.to_string()
            }
        );

        let validator = self.compile(name)?;
        let errors: Vec<String> = validator.iter_errors(instance).map(describe).collect();

        ensure!(
            errors.is_empty(),
            ValidationFailedSnafu {
                name: name.to_string(),
                errors,
            }
        );

        Ok(())
    }

    fn ensure_known(&self, schema_ref: &SchemaRef) -> Result<()> {
        for name in schema_ref.referenced_names() {
            ensure!(
                self.schemas.contains_key(&name),
                UnknownSchemaSnafu { name }
            );
        }
        Ok(())
    }

    /// Standalone document resolving `name` with every registered component
    fn validation_root(&self, name: &str) -> Value {
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$ref": format!("{}{}", COMPONENTS_PREFIX, name),
            "components": {
                "schemas": self.schemas,
            },
        })
    }

    fn compile(&self, name: &str) -> Result<jsonschema::Validator> {
        let root = self.validation_root(name);
        let validator = jsonschema::validator_for(&root);
        match validator {
            Ok(v) => Ok(v),
            Err(e) => InvalidSchemaSnafu {
                name: name.to_string(),
                msg: e.to_string(),
            }
            .fail(),
        }
    }

    /// Rolls back the freshly added entries when the schema does not compile
    fn check_compiles(&mut self, name: &str, added: &[String]) -> Result<()> {
        let compiled = self.compile(name);
        if compiled.is_err() {
            for added_name in added.iter() {
                self.schemas.remove(added_name);
            }
        }
        compiled.map(|_| ())
    }
}

/// Location and failed rule of a validation error. The offending value is
/// left out since it may be a secret.
fn describe(error: ValidationError<'_>) -> String {
    let mut location = error.instance_path.to_string();
    if location.is_empty() {
        location = "/".to_string();
    }

    let detail = match &error.kind {
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("unknown fields: {}", unexpected.join(", "))
        }
        ValidationErrorKind::Required { property } => format!("missing field {}", property),
        ValidationErrorKind::MinLength { limit } => {
            format!("must be at least {} characters", limit)
        }
        ValidationErrorKind::MaxLength { limit } => {
            format!("must be at most {} characters", limit)
        }
        _ => {
            let schema_path = error.schema_path.to_string();
            let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();
            format!("does not match {}", keyword)
        }
    };

    format!("{}: {}", location, detail)
}
