use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::identity::IdentityReference;

/// A work item. Two work items are equal when their ids match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: i32,
    #[serde(default)]
    pub rev: i32,
    /// Field reference name to value, e.g. `System.Title`.
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<WorkItemRelation>,
}

impl WorkItem {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Sets a field, returning the work item for chaining.
    pub fn with_field(mut self, reference_name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(reference_name.into(), value.into());
        self
    }

    /// String value of a field, if present and a string.
    pub fn field_str(&self, reference_name: &str) -> Option<&str> {
        self.fields.get(reference_name).and_then(Value::as_str)
    }
}

impl PartialEq for WorkItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WorkItem {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemRelation {
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

/// One revision of a work item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemUpdate {
    pub id: i32,
    #[serde(default)]
    pub work_item_id: i32,
    #[serde(default)]
    pub rev: i32,
    #[serde(default)]
    pub fields: HashMap<String, WorkItemFieldUpdate>,
    #[serde(default)]
    pub revised_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revised_by: Option<IdentityReference>,
    #[serde(default)]
    pub url: Option<String>,
}

impl WorkItemUpdate {
    /// Change recorded for a field; an empty change when the field is untouched.
    pub fn field(&self, reference_name: &str) -> WorkItemFieldUpdate {
        self.fields
            .get(reference_name)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemFieldUpdate {
    #[serde(default)]
    pub new_value: Option<Value>,
    #[serde(default)]
    pub old_value: Option<Value>,
}

fn is_blank(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

impl WorkItemFieldUpdate {
    pub fn is_value_changed(&self) -> bool {
        self.new_value != self.old_value
    }

    pub fn is_value_cleared(&self) -> bool {
        !is_blank(&self.old_value) && is_blank(&self.new_value)
    }

    pub fn is_empty(&self) -> bool {
        is_blank(&self.old_value) && is_blank(&self.new_value)
    }
}

/// Field metadata as listed by the fields endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemField {
    #[serde(default)]
    pub name: String,
    pub reference_name: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemDeleteResponse {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub deleted_by: Option<String>,
    #[serde(default)]
    pub deleted_date: Option<DateTime<Utc>>,
}

/// A single JSON-Patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// JSON-Patch document updating the fields of an existing work item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateWorkItemRequest {
    pub id: Option<i32>,
    pub updates: Vec<JsonPatchOperation>,
}

impl UpdateWorkItemRequest {
    pub const OPERATION_ADD: &'static str = "add";

    pub fn new(id: i32) -> Self {
        Self {
            id: Some(id),
            updates: Vec::new(),
        }
    }

    pub fn add_field_value(&mut self, reference_name: &str, value: impl Into<Value>) {
        self.updates.push(JsonPatchOperation {
            op: Self::OPERATION_ADD.to_string(),
            path: format!("/fields/{}", reference_name),
            from: None,
            value: Some(value.into()),
        });
    }

    /// Patch document setting every field of `item`, used when creating.
    pub fn from_fields(item: &WorkItem) -> Self {
        let mut request = Self::default();
        for (name, value) in &item.fields {
            request.add_field_value(name, value.clone());
        }
        request
    }
}
