//! # Chunk-to-line adapter for log streams.
//!
//! The runtime delivers logs as frames that do not necessarily align with
//! line boundaries: one frame may carry several lines, and a line may be split
//! across frames. [`split_lines`] re-assembles them.
//!
//! ## Rules
//! - Lines are split on `\n`; a trailing `\r` is removed.
//! - Invalid UTF-8 is replaced lossily.
//! - An unterminated trailing fragment is emitted when the source ends.
//! - The first `Err` from the source is forwarded and ends the stream
//!   (any buffered partial line is discarded).
//! - A line longer than [`MAX_LINE`] bytes ends the stream with a
//!   [`GatewayError::Stream`] ("line too long"); lines completed before it are
//!   still delivered.

use std::collections::VecDeque;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::error::GatewayError;

/// Longest accepted line, in bytes, excluding the terminator.
pub const MAX_LINE: usize = 64 * 1024;

struct LineState<B> {
    id: String,
    chunks: BoxStream<'static, Result<B, GatewayError>>,
    buf: Vec<u8>,
    ready: VecDeque<String>,
    failed: Option<GatewayError>,
    done: bool,
}

impl<B: AsRef<[u8]>> LineState<B> {
    fn push(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            if byte == b'\n' {
                let line = std::mem::take(&mut self.buf);
                self.ready.push_back(decode(line));
            } else if self.buf.len() == MAX_LINE {
                self.buf = Vec::new();
                self.done = true;
                self.failed = Some(GatewayError::Stream {
                    id: self.id.clone(),
                    error: format!("line too long (over {MAX_LINE} bytes)"),
                });
                return;
            } else {
                self.buf.push(byte);
            }
        }
    }

    fn flush(&mut self) {
        if !self.buf.is_empty() {
            let line = std::mem::take(&mut self.buf);
            self.ready.push_back(decode(line));
        }
    }
}

fn decode(mut raw: Vec<u8>) -> String {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    match String::from_utf8(raw) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Turns a stream of byte chunks from container `id` into a stream of text lines.
pub fn split_lines<S, B>(
    id: impl Into<String>,
    chunks: S,
) -> impl Stream<Item = Result<String, GatewayError>> + Send
where
    S: Stream<Item = Result<B, GatewayError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = LineState {
        id: id.into(),
        chunks: chunks.boxed(),
        buf: Vec::new(),
        ready: VecDeque::new(),
        failed: None,
        done: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(line) = st.ready.pop_front() {
                return Some((Ok(line), st));
            }
            if let Some(e) = st.failed.take() {
                return Some((Err(e), st));
            }
            if st.done {
                return None;
            }
            match st.chunks.next().await {
                Some(Ok(chunk)) => st.push(chunk.as_ref()),
                Some(Err(e)) => {
                    st.done = true;
                    st.buf.clear();
                    return Some((Err(e), st));
                }
                None => {
                    st.done = true;
                    st.flush();
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(bytes: &[u8]) -> Result<Vec<u8>, GatewayError> {
        Ok(bytes.to_vec())
    }

    async fn collect(chunks: Vec<Result<Vec<u8>, GatewayError>>) -> Vec<Result<String, GatewayError>> {
        split_lines("abc", stream::iter(chunks)).collect().await
    }

    #[tokio::test]
    async fn test_multiple_lines_in_one_chunk() {
        let out = collect(vec![chunk(b"starting\nok\n")]).await;
        assert_eq!(out, vec![Ok("starting".to_string()), Ok("ok".to_string())]);
    }

    #[tokio::test]
    async fn test_line_split_across_chunks() {
        let out = collect(vec![chunk(b"OOM ki"), chunk(b"lled process 4\r\nrecov"), chunk(b"ering")]).await;
        assert_eq!(
            out,
            vec![
                Ok("OOM killed process 4".to_string()),
                Ok("recovering".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let err = GatewayError::Stream {
            id: "abc".into(),
            error: "connection reset".into(),
        };
        let out = collect(vec![chunk(b"a\npartial"), Err(err.clone()), chunk(b"never\n")]).await;
        assert_eq!(out, vec![Ok("a".to_string()), Err(err)]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_lossy() {
        let out = collect(vec![chunk(b"bad \xff byte\n")]).await;
        assert_eq!(out, vec![Ok("bad \u{fffd} byte".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_lines_are_kept() {
        let out = collect(vec![chunk(b"\n\nx\n")]).await;
        assert_eq!(
            out,
            vec![Ok(String::new()), Ok(String::new()), Ok("x".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unterminated_flood_fails_instead_of_buffering() {
        let flood = vec![chunk(&[b'x'; 40 * 1024]), chunk(&[b'x'; 40 * 1024])];
        let mut lines = Box::pin(split_lines("abc", stream::iter(flood).chain(stream::pending())));

        let next = tokio::time::timeout(std::time::Duration::from_millis(500), lines.next())
            .await
            .expect("line limit reported without waiting for more input");

        match next {
            Some(Err(GatewayError::Stream { id, error })) => {
                assert_eq!(id, "abc");
                assert!(error.contains("line too long"));
            }
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lines_before_overlong_one_are_delivered() {
        let mut bytes = b"ok\n".to_vec();
        bytes.extend(std::iter::repeat_n(b'x', MAX_LINE + 1));
        let out = collect(vec![chunk(&bytes), chunk(b"never\n")]).await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Ok("ok".to_string()));
        assert!(matches!(out[1], Err(GatewayError::Stream { .. })));
    }

    #[tokio::test]
    async fn test_line_at_limit_is_accepted() {
        let mut bytes = vec![b'y'; MAX_LINE];
        bytes.push(b'\n');
        let out = collect(vec![chunk(&bytes)]).await;
        assert_eq!(out, vec![Ok("y".repeat(MAX_LINE))]);
    }
}
