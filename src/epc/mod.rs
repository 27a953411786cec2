//! GS1 Electronic Product Codes
//!
//! EPCs are used to represent GS1 IDs on Gen2 RFID tags.
//! This is documented in the GS1 EPC Tag Data Standard.
//!
//! Five families are supported: [`sgtin::Sgtin`], [`sscc::Sscc`],
//! [`sgln::Sgln`], [`grai::Grai`], and [`giai::Giai`]. Each can be built
//! from element strings, a pure identity URI, a tag URI, or a binary hex
//! string, and each can emit any of those four forms back out.
use crate::error::{EpcError, Result};
use num_enum::TryFromPrimitive;
use std::convert::TryFrom;

pub(crate) mod partition;

pub mod giai;
pub mod grai;
pub mod sgln;
pub mod sgtin;
pub mod sscc;

pub use giai::{Giai, GiaiScheme};
pub use grai::{Grai, GraiScheme};
pub use sgln::{Sgln, SglnScheme};
pub use sgtin::{Sgtin, SgtinScheme};
pub use sscc::Sscc;

pub(crate) const FILTER_VALUE_BITS: u32 = 3;
pub(crate) const PARTITION_BITS: u32 = 3;
const MAX_FILTER_VALUE: u8 = 7;

/// Validate and store a new filter value. Shared by every family's
/// `set_filter_value`, since the 0..=7 rule doesn't vary by family.
pub(crate) fn set_filter_value(slot: &mut u8, value: u8) -> Result<()> {
    if value > MAX_FILTER_VALUE {
        return Err(EpcError::InvalidArgument(format!(
            "filter value {} exceeds the maximum of {}",
            value, MAX_FILTER_VALUE
        )));
    }
    *slot = value;
    Ok(())
}

/// Parse a field already known (by `validate()`) to be all-digits, treating
/// an empty field as zero. Used only at `get_binary` time; padded-numeric
/// fields can legally be empty (a partition row can assign a field zero
/// digits, e.g. SGLN's location reference at partition 0).
pub(crate) fn parse_numeric(s: &str) -> u64 {
    s.parse().unwrap_or(0)
}

/// A GS1 object which is capable of being represented as an EPC.
pub trait Epc {
    /// The EPC pure identity URI, e.g. `urn:epc:id:sgtin:0614141.812345.6789`.
    /// Carries no filter value or scheme; those only matter once an
    /// identifier is destined for a tag.
    fn to_uri(&self) -> String;
    /// The EPC tag URI: the pure identity plus the filter value and the
    /// scheme-size suffix, e.g. `urn:epc:tag:sgtin-96:3.0614141.812345.6789`.
    fn to_tag_uri(&self) -> String;
    /// The binary encoding, as uppercase hex with no separators. Fails with
    /// [`EpcError::InvalidSerial`] if the currently selected scheme can't
    /// represent the element-string fields. Scheme/content compatibility is
    /// never checked eagerly, only here.
    fn get_binary(&self) -> Result<String>;
}

// EPC header values, GS1 EPC TDS Table 14-1, restricted to the headers this
// crate knows how to decode. Headers for other EPC families (GID, SGCN,
// GDTI, CPI, ITIP, the unprogrammed-tag header, ...) are out of scope and
// fall through to `decode_binary`'s `InvalidArgument`.
#[derive(Debug, Eq, PartialEq, TryFromPrimitive, Copy, Clone)]
#[repr(u8)]
enum Header {
    Sgtin96 = 0x30,
    Sscc96 = 0x31,
    Sgln96 = 0x32,
    Grai96 = 0x33,
    Giai96 = 0x34,
    Sgtin198 = 0x36,
    Grai170 = 0x37,
    Giai202 = 0x38,
    Sgln195 = 0x39,
}

/// A decoded EPC of a family not known until the binary's header has been
/// read, as returned by [`decode_binary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpcValue {
    Sgtin(Sgtin),
    Sscc(Sscc),
    Sgln(Sgln),
    Grai(Grai),
    Giai(Giai),
}

impl Epc for EpcValue {
    fn to_uri(&self) -> String {
        match self {
            EpcValue::Sgtin(v) => v.to_uri(),
            EpcValue::Sscc(v) => v.to_uri(),
            EpcValue::Sgln(v) => v.to_uri(),
            EpcValue::Grai(v) => v.to_uri(),
            EpcValue::Giai(v) => v.to_uri(),
        }
    }

    fn to_tag_uri(&self) -> String {
        match self {
            EpcValue::Sgtin(v) => v.to_tag_uri(),
            EpcValue::Sscc(v) => v.to_tag_uri(),
            EpcValue::Sgln(v) => v.to_tag_uri(),
            EpcValue::Grai(v) => v.to_tag_uri(),
            EpcValue::Giai(v) => v.to_tag_uri(),
        }
    }

    fn get_binary(&self) -> Result<String> {
        match self {
            EpcValue::Sgtin(v) => v.get_binary(),
            EpcValue::Sscc(v) => v.get_binary(),
            EpcValue::Sgln(v) => v.get_binary(),
            EpcValue::Grai(v) => v.get_binary(),
            EpcValue::Giai(v) => v.get_binary(),
        }
    }
}

/// Decode a hex-encoded EPC binary of unknown family, as received from an
/// RFID reader, by inspecting its 8-bit header and dispatching to the
/// matching family's binary decoder.
pub fn decode_binary(hex: &str) -> Result<EpcValue> {
    let bits = crate::encoding::hex_to_bin(hex)?;
    if bits.len() < 8 {
        return Err(EpcError::InvalidArgument(
            "binary is too short to contain an 8-bit header".to_string(),
        ));
    }
    let header_value = crate::encoding::decode_integer(&bits[0..8]) as u8;
    let header = Header::try_from(header_value).map_err(|_| {
        EpcError::InvalidArgument(format!("0x{:02X} is not a recognised EPC header", header_value))
    })?;
    Ok(match header {
        Header::Sgtin96 | Header::Sgtin198 => EpcValue::Sgtin(sgtin::Sgtin::create_from_binary(hex)?),
        Header::Sscc96 => EpcValue::Sscc(sscc::Sscc::create_from_binary(hex)?),
        Header::Sgln96 | Header::Sgln195 => EpcValue::Sgln(sgln::Sgln::create_from_binary(hex)?),
        Header::Grai96 | Header::Grai170 => EpcValue::Grai(grai::Grai::create_from_binary(hex)?),
        Header::Giai96 | Header::Giai202 => EpcValue::Giai(giai::Giai::create_from_binary(hex)?),
    })
}
