//! `searchAndReplace` tool.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ops;
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceParams {
    /// Literal text to find.
    pub search_text: String,
    /// Text inserted verbatim in place of each occurrence.
    pub replace_text: String,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "searchAndReplace".to_owned(),
        description: "Replace every occurrence of searchText in the document with replaceText. \
            Matching is literal and case-sensitive; replaceText is inserted as-is."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "searchText": {
                    "type": "string",
                    "description": "Literal text to find"
                },
                "replaceText": {
                    "type": "string",
                    "description": "Replacement text"
                }
            },
            "required": ["searchText", "replaceText"]
        }),
    }
}

pub fn execute(session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: ReplaceParams =
        serde_json::from_value(arguments).context("invalid searchAndReplace parameters")?;

    super::mutate(session, |document| {
        ops::search_and_replace(document, &params.search_text, &params.replace_text)
    })
}
