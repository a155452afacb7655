//! Read-only tools: `findOccurrences`, `getDocumentContent`.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ops;
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindParams {
    pub search_text: String,
}

pub fn find_occurrences_definition() -> ToolDefinition {
    ToolDefinition {
        name: "findOccurrences".to_owned(),
        description: "List every occurrence of searchText with its position and about 20 \
            characters of surrounding context."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "searchText": {
                    "type": "string",
                    "description": "Literal text to find"
                }
            },
            "required": ["searchText"]
        }),
    }
}

pub fn document_content_definition() -> ToolDefinition {
    ToolDefinition {
        name: "getDocumentContent".to_owned(),
        description: "Return the document body text and its word count.".to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn execute_find_occurrences(session: &Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: FindParams =
        serde_json::from_value(arguments).context("invalid findOccurrences parameters")?;

    let result = super::inspect(session, |document| {
        ops::find_occurrences(document, &params.search_text)
    });
    super::to_tool_result(&result)
}

pub fn execute_document_content(session: &Session) -> Result<ToolCallResult> {
    let result = super::inspect(session, |document| ops::get_document_content(document));
    super::to_tool_result(&result)
}
