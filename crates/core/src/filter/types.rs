use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_id_list, deserialize_optional_string, deserialize_string_list};

/// Multi-field filter used both to narrow a data-source query and to key the cache.
///
/// Field declaration order is significant: it is the order fields appear in
/// cache keys and SQL predicates. Empty lists and absent strings impose no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Ultimate parent ids.
    #[serde(deserialize_with = "deserialize_id_list", skip_serializing_if = "Vec::is_empty")]
    pub client: Vec<i64>,
    #[serde(deserialize_with = "deserialize_string_list", skip_serializing_if = "Vec::is_empty")]
    pub segment: Vec<String>,
    #[serde(deserialize_with = "deserialize_string_list", skip_serializing_if = "Vec::is_empty")]
    pub region: Vec<String>,
    #[serde(deserialize_with = "deserialize_string_list", skip_serializing_if = "Vec::is_empty")]
    pub country: Vec<String>,
    #[serde(deserialize_with = "deserialize_optional_string", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_string", skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_string", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_string", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_string", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_string", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl FilterCriteria {
    /// Creates criteria that match everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no field imposes a constraint.
    pub fn is_empty(&self) -> bool {
        self.client.is_empty()
            && self.segment.is_empty()
            && self.region.is_empty()
            && self.country.is_empty()
            && present(&self.parent_id).is_none()
            && present(&self.parent_name).is_none()
            && present(&self.client_id).is_none()
            && present(&self.client_name).is_none()
            && present(&self.customer_id).is_none()
            && present(&self.customer_name).is_none()
    }

    pub fn with_client(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.client = ids.into_iter().collect();
        self
    }

    pub fn with_segment<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.segment = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_region<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.region = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_country<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.country = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent_id(mut self, value: impl Into<String>) -> Self {
        self.parent_id = Some(value.into());
        self
    }

    pub fn with_parent_name(mut self, value: impl Into<String>) -> Self {
        self.parent_name = Some(value.into());
        self
    }

    pub fn with_client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    pub fn with_client_name(mut self, value: impl Into<String>) -> Self {
        self.client_name = Some(value.into());
        self
    }

    pub fn with_customer_id(mut self, value: impl Into<String>) -> Self {
        self.customer_id = Some(value.into());
        self
    }

    pub fn with_customer_name(mut self, value: impl Into<String>) -> Self {
        self.customer_name = Some(value.into());
        self
    }
}

/// Returns the trimmed value when it is present and not blank.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the trimmed, non-blank items of a list.
pub(crate) fn present_items(values: &[String]) -> impl Iterator<Item = &str> {
    values.iter().map(|v| v.trim()).filter(|v| !v.is_empty())
}
