pub mod buffer;
pub mod decoder;
pub mod event;
pub mod observer;
pub mod parse;
pub mod session;

pub use buffer::LineBuffer;
pub use decoder::{FrameDecoder, PrefixedFrameDecoder, Protocol, SseFrameDecoder};
pub use event::{StreamError, StreamEvent};
pub use observer::{NoopObserver, StreamObserver};
pub use parse::{parse_response, parse_stream};
pub use session::{is_hedge_bundle, CompletedToolCall, StreamResult, StreamSession, BUNDLE_TOOL};
