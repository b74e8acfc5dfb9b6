use std::mem;

use super::Chunks;
use crate::Error;
use crate::proto::ChatCompletionChunk;

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// What a single line of the stream turned out to be.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Token(String),
    Done,
    Ignored,
}

/// A type for reading tokens of a streamed chat completion.
///
/// The body is a sequence of `data: <json>` lines ended by `data: [DONE]`.
/// Bytes are buffered until a line is complete, so neither a line nor a
/// multi-byte character split between two chunks gets lost.
pub struct Sse {
    buf: Vec<u8>,
    chunks: Chunks,
}

impl Sse {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: Vec::new(),
            chunks,
        }
    }

    /// Reads the stream to its end and returns the accumulated text.
    ///
    /// `on_token` is called once for every non-empty token, in order. Lines
    /// that can't be decoded are skipped. If reading a chunk fails, the text
    /// received so far is dropped and the error is returned.
    pub async fn collect_tokens(
        mut self,
        mut on_token: impl FnMut(&str),
    ) -> Result<String, Error> {
        let mut text = String::new();

        while let Some(bytes) = self.chunks.next_chunk().await? {
            self.buf.extend_from_slice(&bytes);

            // Complete lines are consumed in place, then dropped at once.
            let mut consumed = 0;
            while let Some(eol_idx) =
                self.buf[consumed..].iter().position(|b| *b == b'\n')
            {
                let line = &self.buf[consumed..consumed + eol_idx];
                consumed += eol_idx + 1;
                match parse_line(strip_cr(line)) {
                    Line::Token(token) => {
                        on_token(&token);
                        text.push_str(&token);
                    }
                    Line::Done => return Ok(text),
                    Line::Ignored => {}
                }
            }
            self.buf.drain(..consumed);
        }

        // The body may end without a final line feed.
        if !self.buf.is_empty() {
            let line = mem::take(&mut self.buf);
            if let Line::Token(token) = parse_line(strip_cr(&line)) {
                on_token(&token);
                text.push_str(&token);
            }
        }

        Ok(text)
    }
}

#[inline]
fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn parse_line(line: &[u8]) -> Line {
    // A line feed never occurs inside a multi-byte sequence, so a complete
    // line is always decodable on its own.
    let Ok(line) = str::from_utf8(line) else {
        trace!("skipping a line with invalid UTF-8");
        return Line::Ignored;
    };
    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return Line::Ignored;
    };
    let data = data.strip_prefix(' ').unwrap_or(data);
    if data.trim() == DONE_SENTINEL {
        return Line::Done;
    }

    trace!("got sse data: {data}");
    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => match chunk.into_token() {
            Some(token) if !token.is_empty() => Line::Token(token),
            _ => Line::Ignored,
        },
        Err(err) => {
            trace!("skipping malformed data ({err}): {data}");
            Line::Ignored
        }
    }
}
