use std::convert::From;
use std::io;

#[derive(Debug)]
pub enum DecompressionError {
    IoError(io::Error),
    /// The stream ended in the middle of a 6-byte block record.
    TruncatedStream,
    /// The stored width is zero, so the image geometry cannot be
    /// reconstructed.
    DegenerateWidth,
}

impl From<io::Error> for DecompressionError {
    fn from(err: io::Error) -> DecompressionError {
        DecompressionError::IoError(err)
    }
}
