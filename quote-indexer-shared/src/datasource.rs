//! Datasource definition for the indexing service.

use serde::{Deserialize, Serialize};

/// Default category for the datasource and its object definitions.
pub const DEFAULT_CATEGORY: &str = "PUBLISHED_CONTENT";

/// Default human-readable datasource name.
pub const DEFAULT_DISPLAY_NAME: &str = "AstraDB Collection DataSource";

/// Default object type published under the datasource.
pub const DEFAULT_OBJECT_NAME: &str = "AstraVectorEntry";

/// An object type declared by a datasource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDefinition {
    pub doc_category: String,
    pub name: String,
}

/// Logical namespace that documents are published under.
///
/// No validation is done here; the indexing service is the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceConfig {
    pub name: String,
    pub display_name: String,
    pub datasource_category: String,
    pub url_regex: String,
    pub object_definitions: Vec<ObjectDefinition>,
}

impl DatasourceConfig {
    /// Datasource with the default display name, category and object type,
    /// matching every URL under `view_url_base`.
    pub fn new(name: impl Into<String>, view_url_base: &str) -> Self {
        Self {
            name: name.into(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            datasource_category: DEFAULT_CATEGORY.to_string(),
            url_regex: format!("^{}", view_url_base.trim_end_matches('/')),
            object_definitions: vec![ObjectDefinition {
                doc_category: DEFAULT_CATEGORY.to_string(),
                name: DEFAULT_OBJECT_NAME.to_string(),
            }],
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_url_regex(mut self, url_regex: impl Into<String>) -> Self {
        self.url_regex = url_regex.into();
        self
    }
}
