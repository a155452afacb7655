//! `doc-replace` — find/replace and highlight engine for paragraph documents.
//!
//! Locates literal occurrences of a query in a document, counts them, and
//! replaces them or toggles a background highlight over each one. The
//! document is always passed in explicitly as a [`DocumentHost`]; the crate
//! ships an in-memory host and an MCP stdio server around it.
//!
//! # Operations
//!
//! - `searchAndReplace` — replace every literal occurrence
//! - `highlightText` — yellow background on every occurrence
//! - `removeHighlightForText` — clear the background on every occurrence
//! - `removeAllHighlights` — clear the background everywhere
//! - `findOccurrences` — positions plus surrounding context
//! - `getDocumentContent` — body text and word count
//!
//! Every operation returns an [`OperationResult`]; host failures become
//! `success: false` results instead of errors.
//!
//! # Architecture
//!
//! ```text
//! stdin (JSON-RPC) → McpServer → ToolRouter → ops → mutator / matcher
//!                                                        ↓
//! stdout (JSON-RPC) ←──────────────────────────── DocumentHost (MemoryDocument)
//! ```

pub mod context;
pub mod document;
pub mod error;
pub mod escape;
pub mod matcher;
pub mod mutator;
pub mod ops;
pub mod result;
pub mod server;
pub mod session;
pub mod tools;
pub mod util;

pub use document::{DocumentHost, ElementRef, MatchSpan, MemoryDocument};
pub use error::{DocError, DocResult};
pub use result::OperationResult;
pub use server::run_mcp_server;
