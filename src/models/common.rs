use serde::{Deserialize, Serialize};

/// One page of a listing endpoint.
///
/// A `null` body is modelled as `Option<CollectionResponse<T>>::None` by the
/// fetch helpers and always counts as an empty page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse<T> {
    #[serde(default)]
    pub count: usize,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

impl<T> CollectionResponse<T> {
    pub fn new(value: Vec<T>) -> Self {
        Self {
            count: value.len(),
            value,
        }
    }

    /// Items of an optional page; an absent page yields no items.
    pub fn into_items(page: Option<Self>) -> Vec<T> {
        page.map(|p| p.value).unwrap_or_default()
    }
}

impl<T> Default for CollectionResponse<T> {
    fn default() -> Self {
        Self {
            count: 0,
            value: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: Option<uuid::Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default)]
    pub id: Option<uuid::Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub project: Option<Project>,
}
