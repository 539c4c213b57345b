use serde_json::Value;

/// Hooks invoked synchronously, in arrival order, as a stream is consumed.
///
/// All methods default to no-ops so callers implement only what they render.
/// `on_text` receives each incremental fragment; the tool hooks fire exactly
/// once per tool call, with fully assembled payloads.
pub trait StreamObserver {
    /// One incremental fragment of assistant text
    fn on_text(&mut self, _text: &str) {}

    /// A tool call whose arguments are finalized
    fn on_tool_call(&mut self, _name: &str, _arguments: &Value) {}

    /// The output of a completed tool call
    fn on_tool_result(&mut self, _name: &str, _output: &Value) {}
}

/// Observer that renders nothing.
pub struct NoopObserver;

impl StreamObserver for NoopObserver {}
