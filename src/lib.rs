//! Encode and decode GS1 Electronic Product Codes.
//!
//! An EPC identifies a physical object (a trade item, a shipping
//! container, a location, a returnable asset, an individual asset) well
//! enough to be carried on a Gen2 RFID tag. Five families are supported,
//! one module each under [`epc`]: [`epc::Sgtin`], [`epc::Sscc`],
//! [`epc::Sgln`], [`epc::Grai`], [`epc::Giai`].
//!
//! Every family can be built from element strings, an EPC pure identity
//! URI, an EPC tag URI, or a binary hex string, and can emit any of those
//! four forms back out through the [`epc::Epc`] trait. [`epc::decode_binary`]
//! recovers the family from an unlabelled binary by reading its header.

mod encoding;
mod validation;

pub mod epc;
pub mod error;
