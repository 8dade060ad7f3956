//! Codec for the MAPS serial protocol spoken by the CF-24P, CF-150 and
//! CF-220/M optical vehicle-detection barriers.
//!
//! Two inverse surfaces share one static command catalog:
//!
//! - the **builders** in [`request`] and [`response`] assemble byte-exact
//!   wire frames from typed payloads, one constructor per command;
//! - the **parser**, [`ParsedFrame::parse`], validates a wire frame
//!   (delimiters, checksum, sequence, direction tag) and decodes it into a
//!   typed [`Payload`].
//!
//! The codec is synchronous, pure and re-entrant. Builders and the parser
//! read only their arguments and the read-only descriptor table, and
//! return owned buffers; serial I/O, request/response correlation and
//! timeouts belong to the caller.
//!
//! ```
//! use maps_proto::{Direction, ParsedFrame, Payload, request};
//!
//! let raw = request::baud_rate(0, 3)?;
//! let parsed = ParsedFrame::parse(raw.as_bytes())?;
//! assert_eq!(parsed.direction, Direction::Request);
//! assert_eq!(parsed.command, "BR");
//! assert_eq!(parsed.payload, Some(Payload::Single(3)));
//! # Ok::<(), maps_proto::ProtocolError>(())
//! ```

mod ascii;
mod command;
mod errors;
mod frame;
mod parse;
pub mod payloads;
pub mod request;
pub mod response;

pub use command::{CommandSpec, Family, FamilyMask, SupportMask, Tag, lookup};
pub use errors::{ProtocolError, Result};
pub use frame::{CR, Direction, LF, RawFrame, SOH};
pub use parse::ParsedFrame;
pub use payloads::Payload;
