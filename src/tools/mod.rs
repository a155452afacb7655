//! Tool router — registers and dispatches MCP tool calls.
//!
//! Each tool maps its JSON arguments onto one function in [`crate::ops`]
//! and returns the [`OperationResult`] both as structured content and as
//! JSON text. Mutating tools save the document afterwards when the session
//! is file-backed with autosave on and the file's content would change.

pub mod find;
pub mod highlight;
pub mod open;
pub mod replace;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::document::MemoryDocument;
use crate::result::OperationResult;
use crate::server::{ContentItem, ToolCallResult, ToolDefinition};
use crate::session::Session;

/// Tool router that dispatches MCP tool calls to the document operations.
pub struct ToolRouter {
    session: Session,
}

impl ToolRouter {
    /// Create a router over `session`.
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// List all available tools with their JSON Schema definitions.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        vec![
            replace::tool_definition(),
            highlight::highlight_definition(),
            highlight::remove_for_text_definition(),
            highlight::remove_all_definition(),
            find::find_occurrences_definition(),
            find::document_content_definition(),
            open::tool_definition(),
        ]
    }

    /// Call a tool by name with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments do not parse or the result cannot
    /// be serialized. Operation failures are reported inside the result.
    pub fn call_tool(&mut self, name: &str, arguments: serde_json::Value) -> Result<ToolCallResult> {
        debug!(tool = name, "dispatching tool call");

        match name {
            "searchAndReplace" => replace::execute(&mut self.session, arguments),
            "highlightText" => highlight::execute_highlight(&mut self.session, arguments),
            "removeHighlightForText" => highlight::execute_remove_for_text(&mut self.session, arguments),
            "removeAllHighlights" => highlight::execute_remove_all(&mut self.session),
            "findOccurrences" => find::execute_find_occurrences(&self.session, arguments),
            "getDocumentContent" => find::execute_document_content(&self.session),
            "openDocument" => open::execute(&mut self.session, arguments),
            _ => Ok(ToolCallResult::text(format!("Unknown tool: {name}"), true)),
        }
    }
}

/// Run a mutating operation on the open document, then save it.
///
/// Styling applied to a document backed by a plain-text file stays in
/// memory only; the result carries a note saying so.
fn mutate(
    session: &mut Session,
    op: impl FnOnce(&mut MemoryDocument) -> OperationResult,
) -> Result<ToolCallResult> {
    let (result, before, after) = match session.document_mut() {
        Ok(document) => {
            let before = document.revision();
            let result = op(document);
            (result, before, document.revision())
        }
        Err(e) => {
            warn!(error = %e, "mutation without a document");
            return to_tool_result(&OperationResult::<()>::failure(&e));
        }
    };

    let unsaved_styling = if after.styles == before.styles {
        None
    } else {
        session.plain_text_source().map(Path::to_path_buf)
    };

    let result = if result.success {
        match session.persist() {
            Ok(_) => result,
            Err(e) => {
                error!(error = %e, "failed to save document");
                OperationResult::failure(&e)
            }
        }
    } else {
        result
    };

    let mut tool_result = to_tool_result(&result)?;
    if let Some(path) = unsaved_styling {
        warn!(path = %path.display(), "styling not saved to plain-text file");
        tool_result.content.push(ContentItem {
            content_type: "text".to_owned(),
            text: format!(
                "Note: styling is not saved to the plain-text file {}; open a .json document to keep highlights",
                path.display()
            ),
        });
    }
    Ok(tool_result)
}

/// Run a read-only operation on the open document.
fn inspect<T>(session: &Session, op: impl FnOnce(&MemoryDocument) -> OperationResult<T>) -> OperationResult<T> {
    match session.document() {
        Ok(document) => op(document),
        Err(e) => {
            warn!(error = %e, "read without a document");
            OperationResult::failure(&e)
        }
    }
}

/// Wrap an operation result for the MCP response.
fn to_tool_result<T: Serialize>(result: &OperationResult<T>) -> Result<ToolCallResult> {
    let value = serde_json::to_value(result).context("failed to serialize operation result")?;
    Ok(ToolCallResult {
        content: vec![ContentItem {
            content_type: "text".to_owned(),
            text: value.to_string(),
        }],
        structured_content: Some(value),
        is_error: !result.success,
    })
}
