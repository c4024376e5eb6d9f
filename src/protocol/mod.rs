//! Wire protocol
//!
//! Request records and the reply text contract between client and server.
//!
//! ## Components
//! - `request`: Operation kinds and the request record
//! - `codec`: Fixed-layout encoding/decoding and stream helpers

mod request;
mod codec;

pub use request::{OpKind, Request, MAX_FIELD_LEN};
pub use codec::{
    decode_reply, decode_request, encode_reply, encode_request, read_reply, read_request,
    write_reply, write_request, FIELD_SIZE, MAX_REPLY_SIZE, REQUEST_SIZE,
};
