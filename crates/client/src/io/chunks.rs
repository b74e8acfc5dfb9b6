#[cfg(test)]
use std::collections::VecDeque;

use bytes::Bytes;
use reqwest::Response;

use crate::Error;

/// An adapter for streaming byte chunks.
pub enum Chunks {
    Response(Response),
    #[cfg(test)]
    VecDeque(VecDeque<Bytes>),
    #[cfg(test)]
    VecDequeThenError(VecDeque<Bytes>, Option<Error>),
}

impl Chunks {
    pub fn from_response(response: Response) -> Self {
        Chunks::Response(response)
    }

    #[cfg(test)]
    pub fn from_vec_deque(vec: VecDeque<Bytes>) -> Self {
        Chunks::VecDeque(vec)
    }

    /// Yields the chunks, then fails once with `err`.
    #[cfg(test)]
    pub fn from_vec_deque_then_error(vec: VecDeque<Bytes>, err: Error) -> Self {
        Chunks::VecDequeThenError(vec, Some(err))
    }

    /// Reads the next chunk, `None` means the body has been fully read.
    ///
    /// For responses, this fails when the request timeout elapses while
    /// waiting for the chunk.
    #[inline]
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, Error> {
        match self {
            Chunks::Response(response) => {
                response.chunk().await.map_err(|err| Error::transport(&err))
            }
            #[cfg(test)]
            Chunks::VecDeque(vec) => {
                let chunk = vec.pop_front();
                Ok(chunk)
            }
            #[cfg(test)]
            Chunks::VecDequeThenError(vec, err) => match vec.pop_front() {
                Some(chunk) => Ok(Some(chunk)),
                None => err.take().map_or(Ok(None), Err),
            },
        }
    }
}
