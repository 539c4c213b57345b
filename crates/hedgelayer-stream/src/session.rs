use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::{Result, StreamError, StreamEvent};
use crate::observer::StreamObserver;

/// Server-side tool whose output is a hedge bundle.
pub const BUNDLE_TOOL: &str = "buildHedgeBundle";

/// A hedge bundle is a JSON object carrying both a position list and an
/// aggregate cost. Applied uniformly to tool outputs and finish payloads.
pub fn is_hedge_bundle(value: &Value) -> bool {
    value
        .as_object()
        .map(|obj| obj.contains_key("positions") && obj.contains_key("totalCost"))
        .unwrap_or(false)
}

/// A completed tool invocation, recorded in completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedToolCall {
    pub name: String,
    pub arguments: Value,
}

/// Aggregate outcome of one consumed stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamResult {
    /// Concatenation of every text delta, in arrival order
    pub assistant_text: String,
    /// Completed tool calls, in completion order
    pub tool_calls: Vec<CompletedToolCall>,
    /// Last hedge bundle seen among tool outputs or finish payloads
    pub hedge_bundle: Option<Value>,
}

struct PendingToolCall {
    tool_name: String,
    argument_buffer: String,
    /// Arguments finalized and reported; awaiting output
    ready: bool,
}

impl PendingToolCall {
    /// Interpret the accumulated argument text, falling back to the raw
    /// text when it is not valid JSON.
    fn buffered_arguments(&self) -> Value {
        serde_json::from_str(&self.argument_buffer)
            .unwrap_or_else(|_| Value::String(self.argument_buffer.clone()))
    }
}

/// Per-stream state machine: tracks in-flight tool calls by id, accumulates
/// assistant text, extracts the hedge bundle, and drives observer dispatch.
///
/// Owned by a single `parse_stream` call; nothing survives it. Events for
/// unknown call ids are ignored rather than failed, since the server may
/// reorder or duplicate frames.
pub struct StreamSession {
    assistant_text: String,
    tool_calls: Vec<CompletedToolCall>,
    pending: HashMap<String, PendingToolCall>,
    hedge_bundle: Option<Value>,
}

impl StreamSession {
    pub fn new() -> Self {
        Self {
            assistant_text: String::new(),
            tool_calls: Vec::new(),
            pending: HashMap::new(),
            hedge_bundle: None,
        }
    }

    /// Apply one event, invoking observer hooks as state transitions occur.
    ///
    /// Returns Err only for a server-reported `error` event, which aborts
    /// the whole parse with the server's message.
    pub fn handle_event(
        &mut self,
        event: StreamEvent,
        observer: &mut dyn StreamObserver,
    ) -> Result<()> {
        match event {
            StreamEvent::TextDelta { text } => {
                if !text.is_empty() {
                    self.assistant_text.push_str(&text);
                    observer.on_text(&text);
                }
            }

            StreamEvent::ToolCallStart { call_id, tool_name } => {
                self.pending.insert(
                    call_id,
                    PendingToolCall {
                        tool_name,
                        argument_buffer: String::new(),
                        ready: false,
                    },
                );
            }

            StreamEvent::ToolCallArgumentDelta { call_id, fragment } => {
                if let Some(pending) = self.pending.get_mut(&call_id) {
                    pending.argument_buffer.push_str(&fragment);
                }
            }

            StreamEvent::ToolCallReady { call_id, input, .. } => {
                // A null input defers to the accumulated argument buffer.
                let input = match input {
                    Value::Null => None,
                    input => Some(input),
                };
                self.finalize_arguments(&call_id, input, observer);
            }

            StreamEvent::ToolResult { call_id, output } => {
                // The prefixed protocol has no separate ready frame; a result
                // for a call still accumulating finalizes its arguments first.
                self.finalize_arguments(&call_id, None, observer);

                if let Some(pending) = self.pending.remove(&call_id) {
                    observer.on_tool_result(&pending.tool_name, &output);

                    if pending.tool_name == BUNDLE_TOOL && is_hedge_bundle(&output) {
                        self.hedge_bundle = Some(output);
                    }
                }
            }

            StreamEvent::Finish { payload } => {
                for item in payload {
                    if is_hedge_bundle(&item) {
                        self.hedge_bundle = Some(item);
                    }
                }
            }

            StreamEvent::Error { message } => {
                return Err(StreamError::Protocol(message));
            }

            StreamEvent::Done => {}
        }

        Ok(())
    }

    /// Transition a pending call to ready: record its completed arguments and
    /// fire `on_tool_call` exactly once. Unknown ids and repeated ready
    /// frames are ignored.
    fn finalize_arguments(
        &mut self,
        call_id: &str,
        input: Option<Value>,
        observer: &mut dyn StreamObserver,
    ) {
        let Some(pending) = self.pending.get_mut(call_id) else {
            return;
        };
        if pending.ready {
            return;
        }
        pending.ready = true;

        let arguments = input.unwrap_or_else(|| pending.buffered_arguments());
        let name = pending.tool_name.clone();

        self.tool_calls.push(CompletedToolCall {
            name: name.clone(),
            arguments: arguments.clone(),
        });
        observer.on_tool_call(&name, &arguments);
    }

    /// Consume the session. Calls still pending are dropped without
    /// synthesizing results.
    pub fn finish(self) -> StreamResult {
        StreamResult {
            assistant_text: self.assistant_text,
            tool_calls: self.tool_calls,
            hedge_bundle: self.hedge_bundle,
        }
    }
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use serde_json::json;

    fn apply(session: &mut StreamSession, events: Vec<StreamEvent>) {
        for event in events {
            session.handle_event(event, &mut NoopObserver).unwrap();
        }
    }

    #[test]
    fn test_orphaned_events_are_ignored() {
        let mut session = StreamSession::new();
        apply(
            &mut session,
            vec![
                StreamEvent::ToolCallArgumentDelta {
                    call_id: "ghost".into(),
                    fragment: "{}".into(),
                },
                StreamEvent::ToolCallReady {
                    call_id: "ghost".into(),
                    tool_name: Some("searchMarkets".into()),
                    input: json!({}),
                },
                StreamEvent::ToolResult {
                    call_id: "ghost".into(),
                    output: json!({"positions": [], "totalCost": 1}),
                },
            ],
        );

        let result = session.finish();
        assert!(result.tool_calls.is_empty());
        assert!(result.hedge_bundle.is_none());
    }

    #[test]
    fn test_duplicate_ready_reports_once() {
        let mut session = StreamSession::new();
        let ready = StreamEvent::ToolCallReady {
            call_id: "1".into(),
            tool_name: None,
            input: json!({"q": "flood"}),
        };
        apply(
            &mut session,
            vec![
                StreamEvent::ToolCallStart {
                    call_id: "1".into(),
                    tool_name: "searchMarkets".into(),
                },
                ready.clone(),
                ready,
            ],
        );

        assert_eq!(session.finish().tool_calls.len(), 1);
    }

    #[test]
    fn test_result_without_ready_parses_buffered_arguments() {
        let mut session = StreamSession::new();
        apply(
            &mut session,
            vec![
                StreamEvent::ToolCallStart {
                    call_id: "1".into(),
                    tool_name: "searchMarkets".into(),
                },
                StreamEvent::ToolCallArgumentDelta {
                    call_id: "1".into(),
                    fragment: r#"{"q":"#.into(),
                },
                StreamEvent::ToolCallArgumentDelta {
                    call_id: "1".into(),
                    fragment: r#""storm"}"#.into(),
                },
                StreamEvent::ToolResult {
                    call_id: "1".into(),
                    output: json!([]),
                },
            ],
        );

        let result = session.finish();
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].arguments, json!({"q": "storm"}));
    }

    #[test]
    fn test_null_ready_input_uses_buffered_arguments() {
        let mut session = StreamSession::new();
        apply(
            &mut session,
            vec![
                StreamEvent::ToolCallStart {
                    call_id: "1".into(),
                    tool_name: "searchMarkets".into(),
                },
                StreamEvent::ToolCallArgumentDelta {
                    call_id: "1".into(),
                    fragment: r#"{"q":"flood"}"#.into(),
                },
                StreamEvent::ToolCallReady {
                    call_id: "1".into(),
                    tool_name: None,
                    input: Value::Null,
                },
            ],
        );

        let result = session.finish();
        assert_eq!(result.tool_calls[0].arguments, json!({"q": "flood"}));
    }

    #[test]
    fn test_invalid_argument_buffer_falls_back_to_raw_text() {
        let mut session = StreamSession::new();
        apply(
            &mut session,
            vec![
                StreamEvent::ToolCallStart {
                    call_id: "1".into(),
                    tool_name: "searchMarkets".into(),
                },
                StreamEvent::ToolCallArgumentDelta {
                    call_id: "1".into(),
                    fragment: "not json".into(),
                },
                StreamEvent::ToolResult {
                    call_id: "1".into(),
                    output: json!([]),
                },
            ],
        );

        let result = session.finish();
        assert_eq!(result.tool_calls[0].arguments, json!("not json"));
    }

    #[test]
    fn test_bundle_requires_known_tool_and_both_keys() {
        let mut session = StreamSession::new();
        apply(
            &mut session,
            vec![
                StreamEvent::ToolCallStart {
                    call_id: "1".into(),
                    tool_name: "searchMarkets".into(),
                },
                StreamEvent::ToolResult {
                    call_id: "1".into(),
                    output: json!({"positions": [], "totalCost": 5}),
                },
                StreamEvent::ToolCallStart {
                    call_id: "2".into(),
                    tool_name: BUNDLE_TOOL.into(),
                },
                StreamEvent::ToolResult {
                    call_id: "2".into(),
                    output: json!({"positions": []}),
                },
            ],
        );

        // Wrong tool, then right tool with an incomplete object: no bundle.
        assert!(session.finish().hedge_bundle.is_none());
    }

    #[test]
    fn test_finish_payload_last_bundle_wins() {
        let mut session = StreamSession::new();
        apply(
            &mut session,
            vec![StreamEvent::Finish {
                payload: vec![
                    json!({"positions": [], "totalCost": 1}),
                    json!("ignored"),
                    json!({"positions": [], "totalCost": 2}),
                ],
            }],
        );

        assert_eq!(
            session.finish().hedge_bundle,
            Some(json!({"positions": [], "totalCost": 2}))
        );
    }

    #[test]
    fn test_error_event_aborts() {
        let mut session = StreamSession::new();
        let err = session
            .handle_event(
                StreamEvent::Error {
                    message: "quota exceeded".into(),
                },
                &mut NoopObserver,
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "quota exceeded");
    }
}
