//! Wire types of the ShiiruMax betting API

pub mod payloads;

pub use payloads::{ResourceId, decode, listing_len, to_body};
