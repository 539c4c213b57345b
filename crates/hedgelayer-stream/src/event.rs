use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One decoded protocol frame.
///
/// Both wire variants normalize to this union; the session state machine
/// consumes it without knowing which decoder produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental fragment of assistant text
    TextDelta { text: String },

    /// The agent opened a tool call; arguments follow incrementally
    ToolCallStart { call_id: String, tool_name: String },

    /// One fragment of a tool call's argument text
    ToolCallArgumentDelta { call_id: String, fragment: String },

    /// A tool call's arguments are finalized
    ToolCallReady {
        call_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_name: Option<String>,
        input: Value,
    },

    /// The server delivered a tool call's output
    ToolResult { call_id: String, output: Value },

    /// Terminal payload of the prefixed protocol's finish frame
    Finish { payload: Vec<Value> },

    /// Server-reported failure; aborts the parse
    Error { message: String },

    /// Termination sentinel, not an error
    Done,
}

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("stream transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Carries the server-supplied message verbatim.
    #[error("{0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, StreamError>;
