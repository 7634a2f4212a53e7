//! JSON command bodies and response decoding for the Data API.
//!
//! Every operation is a `POST` of a single-key JSON object naming the
//! command. Responses carry some of `status`, `data` and `errors`.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::StagingError;
use crate::types::DocumentPage;
use quote_indexer_shared::StagedDocument;

pub(crate) const DELETE_MANY: &str = "deleteMany";
pub(crate) const INSERT_ONE: &str = "insertOne";
pub(crate) const FIND: &str = "find";
pub(crate) const ESTIMATED_DOCUMENT_COUNT: &str = "estimatedDocumentCount";
pub(crate) const CREATE_COLLECTION: &str = "createCollection";
pub(crate) const FIND_COLLECTIONS: &str = "findCollections";

const DUPLICATE_ERROR_CODE: &str = "DOCUMENT_ALREADY_EXISTS";
const AUTH_ERROR_CODES: &[&str] = &["UNAUTHENTICATED_REQUEST", "UNAUTHORIZED"];

pub(crate) fn delete_many() -> Value {
    json!({ DELETE_MANY: { "filter": {} } })
}

pub(crate) fn insert_one(document: &StagedDocument) -> Result<Value, StagingError> {
    let document = serde_json::to_value(document)
        .map_err(|e| StagingError::SerializationError(e.to_string()))?;
    Ok(json!({ INSERT_ONE: { "document": document } }))
}

pub(crate) fn find(page_state: Option<&str>) -> Value {
    let mut options = serde_json::Map::new();
    if let Some(page_state) = page_state {
        options.insert("pageState".to_string(), json!(page_state));
    }
    json!({ FIND: { "filter": {}, "options": options } })
}

pub(crate) fn estimated_document_count() -> Value {
    json!({ ESTIMATED_DOCUMENT_COUNT: {} })
}

pub(crate) fn create_collection(name: &str) -> Value {
    json!({ CREATE_COLLECTION: { "name": name } })
}

pub(crate) fn find_collections() -> Value {
    json!({ FIND_COLLECTIONS: {} })
}

#[derive(Debug, Deserialize)]
struct ErrorDescriptor {
    #[serde(default)]
    message: String,
    #[serde(rename = "errorCode", default)]
    error_code: Option<String>,
}

/// Decoded body of a Data API response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CommandResponse {
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<ErrorDescriptor>,
}

impl CommandResponse {
    /// Parse a response body and turn an `errors` array into an error.
    pub(crate) fn parse(command: &str, body: &str) -> Result<Self, StagingError> {
        let response: Self = serde_json::from_str(body)
            .map_err(|e| StagingError::parse(format!("{} response: {}", command, e)))?;
        response.into_result(command)
    }

    fn into_result(self, command: &str) -> Result<Self, StagingError> {
        let Some(first) = self.errors.first() else {
            return Ok(self);
        };

        let code = first.error_code.clone();
        let err = match code.as_deref() {
            Some(DUPLICATE_ERROR_CODE) => StagingError::DuplicateKey(first.message.clone()),
            Some(c) if AUTH_ERROR_CODES.contains(&c) => {
                StagingError::unauthorized(first.message.clone())
            }
            _ => StagingError::command(command, code, first.message.clone()),
        };
        Err(err)
    }

    pub(crate) fn status_u64(&self, key: &str) -> Option<u64> {
        self.status.as_ref()?.get(key)?.as_u64()
    }

    pub(crate) fn status_i64(&self, key: &str) -> Option<i64> {
        self.status.as_ref()?.get(key)?.as_i64()
    }

    pub(crate) fn status_flag(&self, key: &str) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub(crate) fn status_strings(&self, key: &str) -> Vec<String> {
        self.status
            .as_ref()
            .and_then(|s| s.get(key))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn into_page(self) -> Result<DocumentPage, StagingError> {
        let data = self
            .data
            .ok_or_else(|| StagingError::parse("find response has no data"))?;

        let documents = match data.get("documents") {
            Some(Value::Array(docs)) => docs.clone(),
            _ => return Err(StagingError::parse("find response has no documents array")),
        };
        let next_page_state = data
            .get("nextPageState")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(DocumentPage {
            documents,
            next_page_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_body_with_and_without_page_state() {
        assert_eq!(find(None), json!({"find": {"filter": {}, "options": {}}}));
        assert_eq!(
            find(Some("abc")),
            json!({"find": {"filter": {}, "options": {"pageState": "abc"}}})
        );
    }

    #[test]
    fn test_insert_one_body() {
        let doc = StagedDocument {
            id: 3,
            author: "Hume".to_string(),
            quote: "Custom is the great guide".to_string(),
            tags: vec!["habit".to_string()],
        };
        let body = insert_one(&doc).unwrap();
        assert_eq!(body["insertOne"]["document"]["_id"], 3);
        assert_eq!(body["insertOne"]["document"]["tags"][0], "habit");
    }

    #[test]
    fn test_parse_delete_status() {
        let response =
            CommandResponse::parse(DELETE_MANY, r#"{"status":{"deletedCount":20,"moreData":true}}"#)
                .unwrap();
        assert_eq!(response.status_i64("deletedCount"), Some(20));
        assert!(response.status_flag("moreData"));

        let response =
            CommandResponse::parse(DELETE_MANY, r#"{"status":{"deletedCount":-1}}"#).unwrap();
        assert_eq!(response.status_i64("deletedCount"), Some(-1));
        assert_eq!(response.status_u64("deletedCount"), None);
        assert!(!response.status_flag("moreData"));
    }

    #[test]
    fn test_parse_duplicate_key_error() {
        let body = r#"{"errors":[{"message":"Document already exists with the given _id","errorCode":"DOCUMENT_ALREADY_EXISTS"}]}"#;
        let err = CommandResponse::parse(INSERT_ONE, body).unwrap_err();
        assert!(matches!(err, StagingError::DuplicateKey(_)));
    }

    #[test]
    fn test_parse_generic_command_error() {
        let body = r#"{"errors":[{"message":"bad value","errorCode":"SHRED_BAD_DOCUMENT_TYPE"}]}"#;
        let err = CommandResponse::parse(INSERT_ONE, body).unwrap_err();
        match err {
            StagingError::CommandError { command, code, .. } => {
                assert_eq!(command, "insertOne");
                assert_eq!(code.as_deref(), Some("SHRED_BAD_DOCUMENT_TYPE"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_auth_error_code() {
        let body = r#"{"errors":[{"message":"no token","errorCode":"UNAUTHENTICATED_REQUEST"}]}"#;
        let err = CommandResponse::parse(FIND_COLLECTIONS, body).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_into_page() {
        let body = r#"{"data":{"documents":[{"_id":0},{"_id":1}],"nextPageState":"p2"}}"#;
        let page = CommandResponse::parse(FIND, body).unwrap().into_page().unwrap();
        assert_eq!(page.documents.len(), 2);
        assert_eq!(page.next_page_state.as_deref(), Some("p2"));

        let body = r#"{"data":{"documents":[],"nextPageState":null}}"#;
        let page = CommandResponse::parse(FIND, body).unwrap().into_page().unwrap();
        assert!(page.documents.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_status_strings() {
        let body = r#"{"status":{"collections":["quotes","other"]}}"#;
        let response = CommandResponse::parse(FIND_COLLECTIONS, body).unwrap();
        assert_eq!(response.status_strings("collections"), vec!["quotes", "other"]);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = CommandResponse::parse(FIND, "<html>").unwrap_err();
        assert!(matches!(err, StagingError::ParseError(_)));
    }
}
