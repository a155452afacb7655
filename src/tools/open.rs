//! `openDocument` tool — load a file into the session.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::error;

use crate::result::OperationResult;
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenParams {
    /// `.json` for a styled document, anything else is read as plain text.
    pub path: String,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "openDocument".to_owned(),
        description: "Open a document, replacing the current one. .json files keep highlights; \
            other files are plain text with one paragraph per line."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the document file"
                }
            },
            "required": ["path"]
        }),
    }
}

pub fn execute(session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: OpenParams =
        serde_json::from_value(arguments).context("invalid openDocument parameters")?;

    let result: OperationResult = match session.open(Path::new(&params.path)) {
        Ok(()) => OperationResult::ok(0, format!("Opened {}", params.path)),
        Err(e) => {
            error!(path = params.path, error = %e, "failed to open document");
            OperationResult::failure(&e)
        }
    };
    super::to_tool_result(&result)
}
