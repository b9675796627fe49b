//! Payload schemas
//!
//! The engine only checks that named schemas exist where it matters for
//! reporting; it does not type-check payloads.

use serde::{Deserialize, Serialize};

/// A schema slot: either a name (primitive like `double`, or the `@id` of a
/// declared object schema) or an inline object schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRef {
    Named(String),
    Object(ObjectSchema),
}

impl SchemaRef {
    pub fn named(name: impl Into<String>) -> Self {
        SchemaRef::Named(name.into())
    }

    /// Collect every schema name this slot refers to, including names used
    /// by nested inline fields
    pub fn referenced_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            SchemaRef::Named(name) => out.push(name),
            SchemaRef::Object(object) => {
                for field in &object.fields {
                    field.schema.referenced_names(out);
                }
            }
        }
    }
}

/// A structured payload shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@type", default = "default_object_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

/// A named field of an object schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub schema: SchemaRef,
}

fn default_object_kind() -> String {
    "Object".to_string()
}

impl ObjectSchema {
    pub fn new(id: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            id: Some(id.into()),
            kind: default_object_kind(),
            display_name: None,
            fields,
        }
    }
}

impl SchemaField {
    pub fn new(name: impl Into<String>, schema: SchemaRef) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_ref_decodes_name_or_object() {
        let named: SchemaRef = serde_json::from_value(json!("double")).unwrap();
        assert_eq!(named, SchemaRef::named("double"));

        let object: SchemaRef = serde_json::from_value(json!({
            "@type": "Object",
            "fields": [{ "name": "reading", "schema": "dtmi:com:example:Reading;1" }]
        }))
        .unwrap();

        let mut names = Vec::new();
        object.referenced_names(&mut names);
        assert_eq!(names, vec!["dtmi:com:example:Reading;1"]);
    }
}
