//! Interleaving text from two byte sources.

use std::io;

use futures::stream::{self, Stream};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::wrappers::LinesStream;

/// Merges two readers into one stream of UTF-8 lines.
///
/// Lines are yielded in whatever order they become ready, without their line
/// terminator. The stream ends once both readers reach EOF; a read error
/// (including invalid UTF-8) is yielded in place of a line.
pub fn merge_streams<A, B>(left: A, right: B) -> impl Stream<Item = io::Result<String>>
where
    A: AsyncRead + Unpin,
    B: AsyncRead + Unpin,
{
    stream::select(
        LinesStream::new(BufReader::new(left).lines()),
        LinesStream::new(BufReader::new(right).lines()),
    )
}
