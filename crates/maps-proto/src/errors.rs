//! Codec error types.
//!
//! All failures are returned by value; there is no partial output. The
//! variants follow the wire taxonomy: caller mistakes are
//! [`ProtocolError::InvalidArgument`], everything else describes a frame
//! that arrived broken.

use thiserror::Error;

/// Convenience alias for codec results.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced by the builders and the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A builder received an argument outside its documented range, or an
    /// empty payload for a command that does not take one.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What the caller got wrong.
        reason: &'static str,
    },

    /// The frame structure is broken: size, delimiters, or sequence byte.
    #[error("bad frame: {reason}")]
    BadFrame {
        /// Which structural rule failed.
        reason: &'static str,
    },

    /// The command tag has no entry in the descriptor table.
    #[error("unknown command: {tag}")]
    UnknownCommand {
        /// The offending tag, lossily decoded for display.
        tag: String,
    },

    /// The two checksum bytes on the wire do not match the recomputed LRC.
    #[error("checksum mismatch: wire {found:?}, computed {computed:?}")]
    ChecksumMismatch {
        /// Checksum bytes read from the frame.
        found: [u8; 2],
        /// Checksum recomputed over the frame contents.
        computed: [u8; 2],
    },

    /// An `NE` reply with the wrong size (unknown replies are exactly
    /// 9 bytes and carry no payload).
    #[error("malformed unknown-reply frame: {len} bytes, expected 9")]
    MalformedUnknownReply {
        /// Actual wire length of the reply.
        len: usize,
    },

    /// The payload bytes do not match the command's field grammar.
    #[error("malformed payload: {reason}")]
    MalformedPayload {
        /// Which field or length rule failed.
        reason: &'static str,
    },
}
