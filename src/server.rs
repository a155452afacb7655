//! Newline-delimited JSON-RPC 2.0 over stdio, exposing the document
//! operations as MCP tools (protocol 2025-06-18).
//!
//! Bad input never ends the session: oversized, non-UTF-8 and unparsable
//! lines each get an error response and the next line is read. Only I/O
//! failures on the streams themselves stop [`serve`].

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::session::Session;
use crate::tools::ToolRouter;

/// Longest request line accepted.
const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerInfo {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct ServerCapabilities {
    tools: ToolsCapability,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolsCapability {
    list_changed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult {
    protocol_version: String,
    capabilities: ServerCapabilities,
    server_info: ServerInfo,
}

/// One entry of `tools/list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolsListResult {
    tools: Vec<ToolDefinition>,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Result of `tools/call`.
///
/// `structured_content` carries the operation result as JSON; `content`
/// holds the same value rendered as text for clients that only read text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ContentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// A plain-text result.
    pub fn text(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            content: vec![ContentItem {
                content_type: "text".to_owned(),
                text: text.into(),
            }],
            structured_content: None,
            is_error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Document to open at startup. Without one, every operation reports
    /// "no active document" until `openDocument` is called.
    pub document: Option<PathBuf>,
    /// Write the document back to its file after each successful mutation.
    pub autosave: bool,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            document: None,
            autosave: true,
        }
    }
}

/// Open the configured document, then serve stdin until it closes.
///
/// # Errors
///
/// Fails when the startup document cannot be loaded, or on stdio failure.
pub fn run_mcp_server(config: McpServerConfig) -> Result<()> {
    info!(
        document = ?config.document,
        autosave = config.autosave,
        "doc-replace MCP server starting"
    );

    let mut session = Session::new(config.autosave);
    if let Some(path) = &config.document {
        session
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
    }

    let mut router = ToolRouter::new(session);
    let stdin = std::io::stdin();
    let mut reader = std::io::BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    serve(&mut router, &mut reader, &mut stdout)?;

    info!("doc-replace MCP server stopped");
    Ok(())
}

/// Answer requests from `reader` on `out` until EOF.
///
/// # Errors
///
/// Fails only when `reader` or `out` does.
pub fn serve(router: &mut ToolRouter, reader: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut line_buf = String::new();

    loop {
        line_buf.clear();
        match read_line_limited(reader, &mut line_buf, MAX_LINE_BYTES)
            .context("failed to read request")?
        {
            LineRead::Eof => {
                info!("input closed, shutting down");
                break;
            }
            LineRead::TooLong => {
                warn!(max_bytes = MAX_LINE_BYTES, "request line too long, discarded");
                let resp = error_response(
                    None,
                    -32600,
                    &format!("invalid request: line exceeds {MAX_LINE_BYTES} bytes"),
                );
                write_response(out, &resp)?;
                continue;
            }
            LineRead::Invalid => {
                warn!("request line is not valid UTF-8, discarded");
                let resp = error_response(None, -32700, "parse error: request is not valid UTF-8");
                write_response(out, &resp)?;
                continue;
            }
            LineRead::Line => {}
        }

        let trimmed = line_buf.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!(raw = trimmed, "received request");

        let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "invalid JSON-RPC request");
                let resp = error_response(None, -32700, &format!("parse error: {e}"));
                write_response(out, &resp)?;
                continue;
            }
        };

        if request.jsonrpc != "2.0" {
            warn!(
                version = request.jsonrpc,
                "invalid JSON-RPC version (expected \"2.0\")"
            );
            let resp = error_response(
                request.id.clone(),
                -32600,
                &format!("invalid request: jsonrpc version must be \"2.0\", got \"{}\"", request.jsonrpc),
            );
            write_response(out, &resp)?;
            continue;
        }

        let is_notification = request.id.is_none();
        let response = dispatch(router, &request);

        if is_notification {
            debug!(method = request.method, "notification handled (no response)");
            continue;
        }

        if let Some(resp) = response {
            write_response(out, &resp)?;
        }
    }

    Ok(())
}

fn dispatch(router: &mut ToolRouter, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => Some(handle_initialize(req)),
        "notifications/initialized" => {
            info!("client initialized");
            None
        }
        "tools/list" => Some(handle_tools_list(router, req)),
        "tools/call" => Some(handle_tools_call(router, req)),
        "ping" => Some(handle_ping(req)),
        _ => {
            warn!(method = req.method, "unknown method");
            Some(error_response(
                req.id.clone(),
                -32601,
                &format!("method not found: {}", req.method),
            ))
        }
    }
}

fn handle_initialize(req: &JsonRpcRequest) -> JsonRpcResponse {
    let result = InitializeResult {
        protocol_version: "2025-06-18".to_owned(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
        },
        server_info: ServerInfo {
            name: "doc-replace".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        },
    };

    success_response(req.id.clone(), &result)
}

fn handle_tools_list(router: &ToolRouter, req: &JsonRpcRequest) -> JsonRpcResponse {
    let tools = router.list_tools();
    let result = ToolsListResult { tools };
    success_response(req.id.clone(), &result)
}

fn handle_tools_call(router: &mut ToolRouter, req: &JsonRpcRequest) -> JsonRpcResponse {
    let params: ToolCallParams = match serde_json::from_value(req.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return error_response(
                req.id.clone(),
                -32602,
                &format!("invalid tools/call params: {e}"),
            );
        }
    };

    match router.call_tool(&params.name, params.arguments) {
        Ok(result) => success_response(req.id.clone(), &result),
        Err(e) => {
            error!(tool = params.name, error = %e, "tool call failed");
            let result = ToolCallResult::text(format!("Error: {e:#}"), true);
            success_response(req.id.clone(), &result)
        }
    }
}

fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
    success_response(req.id.clone(), &serde_json::json!({}))
}

fn success_response(id: Option<serde_json::Value>, result: &impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse {
            jsonrpc: "2.0".to_owned(),
            id,
            result: Some(v),
            error: None,
        },
        Err(e) => {
            error!(error = %e, "failed to serialize success response");
            JsonRpcResponse {
                jsonrpc: "2.0".to_owned(),
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32603,
                    message: format!("internal error: failed to serialize result: {e}"),
                    data: None,
                }),
            }
        }
    }
}

fn error_response(id: Option<serde_json::Value>, code: i64, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_owned(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_owned(),
            data: None,
        }),
    }
}

fn write_response(out: &mut impl Write, resp: &JsonRpcResponse) -> Result<()> {
    let json = serde_json::to_string(resp).context("failed to serialize response")?;
    debug!(response = json, "sending response");
    out.write_all(json.as_bytes())
        .context("failed to write response")?;
    out.write_all(b"\n")
        .context("failed to write response newline")?;
    out.flush().context("failed to flush response")?;
    Ok(())
}

/// Outcome of reading one request line.
#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Eof,
    Line,
    TooLong,
    Invalid,
}

/// Read a line from `reader` into `buf`, stopping at newline or `max_bytes`.
///
/// An oversized line is consumed through its newline and discarded, and
/// reported as [`LineRead::TooLong`]. A line that is not UTF-8 is consumed
/// the same way and reported as [`LineRead::Invalid`].
fn read_line_limited(reader: &mut impl BufRead, buf: &mut String, max_bytes: usize) -> Result<LineRead> {
    let mut bytes = Vec::new();
    let mut too_long = false;
    loop {
        let available = reader.fill_buf().context("input fill_buf failed")?;
        if available.is_empty() {
            break; // EOF
        }
        let (consumed, found_newline) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };
        if !too_long {
            if bytes.len() + consumed > max_bytes {
                too_long = true;
                bytes.clear();
            } else {
                bytes.extend_from_slice(&available[..consumed]);
            }
        }
        reader.consume(consumed);
        if found_newline {
            if too_long {
                return Ok(LineRead::TooLong);
            }
            break;
        }
    }

    if too_long {
        return Ok(LineRead::TooLong);
    }
    if bytes.is_empty() {
        return Ok(LineRead::Eof);
    }
    match String::from_utf8(bytes) {
        Ok(line) => {
            buf.push_str(&line);
            Ok(LineRead::Line)
        }
        Err(_) => Ok(LineRead::Invalid),
    }
}
