//! Error types for `aris-core`: assembling frame fragments and writing
//! recordings.

use std::io;

use thiserror::Error;

use crate::frame_builder::FrameBuilderError;

/// Errors constructing or appending to a [`crate::frame_builder::FrameBuilder`]
/// from within the assembler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblerError {
    /// The first fragment of a frame was malformed.
    #[error("malformed first part: {0}")]
    MalformedFirstPart(#[from] FrameBuilderError),
}

/// Errors opening or writing an ARIS recording file.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// Creating or opening the recording file failed.
    #[error("failed to open recording file: {0}")]
    Open(#[source] io::Error),

    /// A write to the recording file failed partway through.
    #[error("write to recording file failed: {0}")]
    Write(#[source] io::Error),

    /// Seeking to back-patch a header field failed.
    #[error("seek for header back-patch failed: {0}")]
    Seek(#[source] io::Error),
}

impl From<io::Error> for RecordingError {
    fn from(err: io::Error) -> Self {
        Self::Write(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembler_error_wraps_frame_builder_error() {
        let source = FrameBuilderError::EmptyHeader;
        let err = AssemblerError::from(source.clone());
        assert_eq!(err, AssemblerError::MalformedFirstPart(source));
    }

    #[test]
    fn recording_error_messages_are_distinct() {
        let open = RecordingError::Open(io::Error::other("disk full"));
        let write = RecordingError::Write(io::Error::other("disk full"));
        assert_ne!(open.to_string(), write.to_string());
    }
}
