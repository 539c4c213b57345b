use serde::Deserialize;
use serde_json::Value;

use crate::event::StreamEvent;

/// Strategy pattern for the two wire shapes the chat endpoint may speak.
///
/// A decoder is selected once per stream; it classifies one complete line at
/// a time. `None` means the line carries no event (blank, comment, sentinel,
/// unknown type, malformed payload) and is skipped without error.
pub trait FrameDecoder: Send {
    fn decode_line(&self, line: &str) -> Option<StreamEvent>;
}

/// Wire protocol selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// `data: <json>` lines with a `type` discriminator, `[DONE]` sentinel
    Sse,
    /// `<code>:<json>` lines with single-character codes `0 9 a b d e`
    Prefixed,
}

impl Protocol {
    pub fn decoder(self) -> Box<dyn FrameDecoder> {
        match self {
            Protocol::Sse => Box::new(SseFrameDecoder),
            Protocol::Prefixed => Box::new(PrefixedFrameDecoder),
        }
    }
}

// ============================================================================
// SSE VARIANT (`data:`-framed typed JSON)
// ============================================================================

/// Typed JSON-per-line frames as sent by the chat endpoint's SSE mode.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum SseFrame {
    TextDelta {
        delta: String,
    },
    ToolInputStart {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolName")]
        tool_name: String,
    },
    ToolInputDelta {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "inputTextDelta")]
        input_text_delta: String,
    },
    ToolInputAvailable {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolName")]
        tool_name: Option<String>,
        input: Value,
    },
    ToolOutputAvailable {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        output: Value,
    },
    Error {
        #[serde(rename = "errorText")]
        error_text: String,
    },
    #[serde(other)]
    Unknown,
}

pub struct SseFrameDecoder;

impl FrameDecoder for SseFrameDecoder {
    fn decode_line(&self, line: &str) -> Option<StreamEvent> {
        if line.is_empty() || line.starts_with(':') {
            return None;
        }

        let payload = line.strip_prefix("data:")?.trim();

        if payload == "[DONE]" {
            return Some(StreamEvent::Done);
        }

        match serde_json::from_str::<SseFrame>(payload).ok()? {
            SseFrame::TextDelta { delta } => Some(StreamEvent::TextDelta { text: delta }),
            SseFrame::ToolInputStart {
                tool_call_id,
                tool_name,
            } => Some(StreamEvent::ToolCallStart {
                call_id: tool_call_id,
                tool_name,
            }),
            SseFrame::ToolInputDelta {
                tool_call_id,
                input_text_delta,
            } => Some(StreamEvent::ToolCallArgumentDelta {
                call_id: tool_call_id,
                fragment: input_text_delta,
            }),
            SseFrame::ToolInputAvailable {
                tool_call_id,
                tool_name,
                input,
            } => Some(StreamEvent::ToolCallReady {
                call_id: tool_call_id,
                tool_name,
                input,
            }),
            SseFrame::ToolOutputAvailable {
                tool_call_id,
                output,
            } => Some(StreamEvent::ToolResult {
                call_id: tool_call_id,
                output,
            }),
            SseFrame::Error { error_text } => Some(StreamEvent::Error {
                message: error_text,
            }),
            SseFrame::Unknown => None,
        }
    }
}

// ============================================================================
// PREFIXED VARIANT (single-character codes)
// ============================================================================

#[derive(Debug, Deserialize)]
struct PrefixedToolStart {
    #[serde(rename = "toolCallId")]
    tool_call_id: String,
    #[serde(rename = "toolName")]
    tool_name: String,
}

#[derive(Debug, Deserialize)]
struct PrefixedArgsDelta {
    #[serde(rename = "toolCallId")]
    tool_call_id: String,
    #[serde(rename = "argsTextDelta")]
    args_text_delta: String,
}

#[derive(Debug, Deserialize)]
struct PrefixedToolResult {
    #[serde(rename = "toolCallId")]
    tool_call_id: String,
    result: Value,
}

pub struct PrefixedFrameDecoder;

impl FrameDecoder for PrefixedFrameDecoder {
    fn decode_line(&self, line: &str) -> Option<StreamEvent> {
        let bytes = line.as_bytes();
        if bytes.len() < 2 || bytes[1] != b':' {
            return None;
        }
        // bytes[1] is ASCII ':' so bytes[0] cannot open a multi-byte scalar;
        // slicing at 2 stays on a char boundary.
        let payload = &line[2..];

        match bytes[0] {
            b'0' => serde_json::from_str::<String>(payload)
                .ok()
                .map(|text| StreamEvent::TextDelta { text }),
            b'9' => serde_json::from_str::<PrefixedToolStart>(payload)
                .ok()
                .map(|frame| StreamEvent::ToolCallStart {
                    call_id: frame.tool_call_id,
                    tool_name: frame.tool_name,
                }),
            b'a' => serde_json::from_str::<PrefixedArgsDelta>(payload)
                .ok()
                .map(|frame| StreamEvent::ToolCallArgumentDelta {
                    call_id: frame.tool_call_id,
                    fragment: frame.args_text_delta,
                }),
            b'b' => serde_json::from_str::<PrefixedToolResult>(payload)
                .ok()
                .map(|frame| StreamEvent::ToolResult {
                    call_id: frame.tool_call_id,
                    output: frame.result,
                }),
            b'd' => match serde_json::from_str::<Value>(payload).ok()? {
                Value::Array(items) => Some(StreamEvent::Finish { payload: items }),
                _ => None,
            },
            b'e' => {
                let message = match serde_json::from_str::<Value>(payload).ok()? {
                    Value::String(message) => message,
                    other => other.to_string(),
                };
                Some(StreamEvent::Error { message })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sse_text_delta() {
        let event = SseFrameDecoder
            .decode_line(r#"data: {"type":"text-delta","id":"0","delta":"Hi"}"#)
            .unwrap();
        assert_eq!(event, StreamEvent::TextDelta { text: "Hi".into() });
    }

    #[test]
    fn test_sse_tool_frames() {
        let start = SseFrameDecoder
            .decode_line(r#"data: {"type":"tool-input-start","toolCallId":"1","toolName":"searchMarkets"}"#)
            .unwrap();
        assert_eq!(
            start,
            StreamEvent::ToolCallStart {
                call_id: "1".into(),
                tool_name: "searchMarkets".into(),
            }
        );

        let delta = SseFrameDecoder
            .decode_line(r#"data: {"type":"tool-input-delta","toolCallId":"1","inputTextDelta":"{\"q\":"}"#)
            .unwrap();
        assert_eq!(
            delta,
            StreamEvent::ToolCallArgumentDelta {
                call_id: "1".into(),
                fragment: "{\"q\":".into(),
            }
        );

        let ready = SseFrameDecoder
            .decode_line(r#"data: {"type":"tool-input-available","toolCallId":"1","input":{"q":"flood"}}"#)
            .unwrap();
        assert_eq!(
            ready,
            StreamEvent::ToolCallReady {
                call_id: "1".into(),
                tool_name: None,
                input: json!({"q": "flood"}),
            }
        );

        let output = SseFrameDecoder
            .decode_line(r#"data: {"type":"tool-output-available","toolCallId":"1","output":[1,2]}"#)
            .unwrap();
        assert_eq!(
            output,
            StreamEvent::ToolResult {
                call_id: "1".into(),
                output: json!([1, 2]),
            }
        );
    }

    #[test]
    fn test_sse_skips_noise() {
        let decoder = SseFrameDecoder;
        assert_eq!(decoder.decode_line(""), None);
        assert_eq!(decoder.decode_line(": keep-alive"), None);
        assert_eq!(decoder.decode_line("event: message"), None);
        assert_eq!(decoder.decode_line("data: not json"), None);
        assert_eq!(decoder.decode_line(r#"data: {"type":"text-delta"}"#), None);
        assert_eq!(
            decoder.decode_line(r#"data: {"type":"usage","tokens":12}"#),
            None
        );
    }

    #[test]
    fn test_sse_done_sentinel() {
        assert_eq!(
            SseFrameDecoder.decode_line("data: [DONE]"),
            Some(StreamEvent::Done)
        );
    }

    #[test]
    fn test_sse_error_frame() {
        let event = SseFrameDecoder
            .decode_line(r#"data: {"type":"error","errorText":"rate limited"}"#)
            .unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                message: "rate limited".into(),
            }
        );
    }

    #[test]
    fn test_prefixed_text_and_tools() {
        let decoder = PrefixedFrameDecoder;

        assert_eq!(
            decoder.decode_line(r#"0:"Hi there""#),
            Some(StreamEvent::TextDelta {
                text: "Hi there".into(),
            })
        );
        assert_eq!(
            decoder.decode_line(r#"9:{"toolCallId":"c1","toolName":"buildHedgeBundle"}"#),
            Some(StreamEvent::ToolCallStart {
                call_id: "c1".into(),
                tool_name: "buildHedgeBundle".into(),
            })
        );
        assert_eq!(
            decoder.decode_line(r#"a:{"toolCallId":"c1","argsTextDelta":"{}"}"#),
            Some(StreamEvent::ToolCallArgumentDelta {
                call_id: "c1".into(),
                fragment: "{}".into(),
            })
        );
        assert_eq!(
            decoder.decode_line(r#"b:{"toolCallId":"c1","result":{"ok":true}}"#),
            Some(StreamEvent::ToolResult {
                call_id: "c1".into(),
                output: json!({"ok": true}),
            })
        );
    }

    #[test]
    fn test_prefixed_finish_payload() {
        let event = PrefixedFrameDecoder
            .decode_line(r#"d:[{"positions":[],"totalCost":0},"done"]"#)
            .unwrap();
        assert_eq!(
            event,
            StreamEvent::Finish {
                payload: vec![json!({"positions": [], "totalCost": 0}), json!("done")],
            }
        );

        // Non-array finish payloads are malformed and skipped.
        assert_eq!(
            PrefixedFrameDecoder.decode_line(r#"d:{"positions":[]}"#),
            None
        );
    }

    #[test]
    fn test_prefixed_error_payloads() {
        let decoder = PrefixedFrameDecoder;

        assert_eq!(
            decoder.decode_line(r#"e:"boom""#),
            Some(StreamEvent::Error {
                message: "boom".into(),
            })
        );
        assert_eq!(
            decoder.decode_line(r#"e:{"code":500}"#),
            Some(StreamEvent::Error {
                message: r#"{"code":500}"#.into(),
            })
        );
        assert_eq!(decoder.decode_line("e:not json"), None);
    }

    #[test]
    fn test_prefixed_skips_noise() {
        let decoder = PrefixedFrameDecoder;
        assert_eq!(decoder.decode_line(""), None);
        assert_eq!(decoder.decode_line("x"), None);
        assert_eq!(decoder.decode_line("plain text"), None);
        assert_eq!(decoder.decode_line(r#"z:{"unknown":"code"}"#), None);
        assert_eq!(decoder.decode_line("0:unquoted"), None);
        // Multi-byte first character cannot be a valid code.
        assert_eq!(decoder.decode_line("é:payload"), None);
    }
}
