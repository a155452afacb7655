//! Highlight tools: `highlightText`, `removeHighlightForText`, `removeAllHighlights`.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ops;
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Literal text whose occurrences are styled.
    pub search_text: String,
}

fn search_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "searchText": {
                "type": "string",
                "description": "Literal text to find"
            }
        },
        "required": ["searchText"]
    })
}

pub fn highlight_definition() -> ToolDefinition {
    ToolDefinition {
        name: "highlightText".to_owned(),
        description: "Highlight every occurrence of searchText with a yellow background.".to_owned(),
        input_schema: search_schema(),
    }
}

pub fn remove_for_text_definition() -> ToolDefinition {
    ToolDefinition {
        name: "removeHighlightForText".to_owned(),
        description: "Clear the background highlight on every occurrence of searchText.".to_owned(),
        input_schema: search_schema(),
    }
}

pub fn remove_all_definition() -> ToolDefinition {
    ToolDefinition {
        name: "removeAllHighlights".to_owned(),
        description: "Clear the background highlight across the whole document.".to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn execute_highlight(session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: SearchParams =
        serde_json::from_value(arguments).context("invalid highlightText parameters")?;

    super::mutate(session, |document| {
        ops::highlight_text(document, &params.search_text)
    })
}

pub fn execute_remove_for_text(session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: SearchParams =
        serde_json::from_value(arguments).context("invalid removeHighlightForText parameters")?;

    super::mutate(session, |document| {
        ops::remove_highlight_for_text(document, &params.search_text)
    })
}

pub fn execute_remove_all(session: &mut Session) -> Result<ToolCallResult> {
    super::mutate(session, |document| ops::remove_all_highlights(document))
}
