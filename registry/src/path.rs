use crate::schema::SchemaRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Method::Get => write!(f, "get"),
            Method::Post => write!(f, "post"),
            Method::Put => write!(f, "put"),
            Method::Patch => write!(f, "patch"),
            Method::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
}

impl core::fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            ParamLocation::Path => write!(f, "path"),
            ParamLocation::Query => write!(f, "query"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamDoc {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: SchemaRef,
}

impl ParamDoc {
    /// Path params are always required
    pub fn path(name: &str, schema: SchemaRef) -> Self {
        Self {
            name: name.to_string(),
            location: ParamLocation::Path,
            required: true,
            description: None,
            schema,
        }
    }

    pub fn query(name: &str, schema: SchemaRef) -> Self {
        Self {
            name: name.to_string(),
            location: ParamLocation::Query,
            required: false,
            description: None,
            schema,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ResponseDoc {
    pub status: u16,
    pub description: String,
    pub schema: Option<SchemaRef>,
}

/// Describes one verb on one path: params, JSON body and responses
#[derive(Debug, Clone)]
pub struct PathDoc {
    pub method: Method,
    pub path: String,
    pub operation_id: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub params: Vec<ParamDoc>,
    pub body: Option<SchemaRef>,
    pub responses: Vec<ResponseDoc>,
}

impl PathDoc {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            operation_id: None,
            description: String::new(),
            tags: Vec::new(),
            params: Vec::new(),
            body: None,
            responses: Vec::new(),
        }
    }

    pub fn operation_id(mut self, id: &str) -> Self {
        self.operation_id = Some(id.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn param(mut self, param: ParamDoc) -> Self {
        self.params.push(param);
        self
    }

    pub fn body(mut self, schema: SchemaRef) -> Self {
        self.body = Some(schema);
        self
    }

    pub fn response(mut self, status: u16, description: &str, schema: Option<SchemaRef>) -> Self {
        self.responses.push(ResponseDoc {
            status,
            description: description.to_string(),
            schema,
        });
        self
    }

    /// Names inside `{}` segments, in path order
    pub fn placeholders(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter_map(|segment| {
                segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                    .map(|s| s.to_string())
            })
            .collect()
    }

    /// Every shape referenced by params, body and responses
    pub fn schema_refs(&self) -> Vec<&SchemaRef> {
        let mut refs: Vec<&SchemaRef> = self.params.iter().map(|p| &p.schema).collect();
        if let Some(body) = &self.body {
            refs.push(body);
        }
        refs.extend(self.responses.iter().filter_map(|r| r.schema.as_ref()));
        refs
    }
}
