use futures::{Stream, StreamExt};

use crate::buffer::LineBuffer;
use crate::decoder::{FrameDecoder, Protocol};
use crate::event::{Result, StreamError};
use crate::observer::StreamObserver;
use crate::session::{StreamResult, StreamSession};

/// Consume a stream of byte chunks and reassemble it into a `StreamResult`,
/// invoking observer hooks as events arrive.
///
/// Chunk boundaries are arbitrary: lines and multi-byte characters split
/// across chunks are carried over and produce the same result as the unsplit
/// input. A trailing fragment with no line terminator at end-of-stream is
/// dropped; the server closes every frame with a newline.
///
/// Fails on a transport error from the chunk source or on a server-reported
/// `error` frame (with the server's message verbatim); all other malformed
/// input is skipped.
pub async fn parse_stream<S, B, E>(
    chunks: S,
    decoder: &dyn FrameDecoder,
    observer: &mut dyn StreamObserver,
) -> Result<StreamResult>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut chunks = Box::pin(chunks);
    let mut buffer = LineBuffer::with_capacity(4096);
    let mut session = StreamSession::new();

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|e| StreamError::Transport(Box::new(e)))?;
        buffer.extend(chunk.as_ref());

        while let Some(line) = buffer.next_line() {
            if let Some(event) = decoder.decode_line(&line) {
                session.handle_event(event, observer)?;
            }
        }
    }

    Ok(session.finish())
}

/// Consume the body of a streaming chat response with the given protocol.
pub async fn parse_response(
    response: reqwest::Response,
    protocol: Protocol,
    observer: &mut dyn StreamObserver,
) -> Result<StreamResult> {
    let decoder = protocol.decoder();
    parse_stream(response.bytes_stream(), decoder.as_ref(), observer).await
}
