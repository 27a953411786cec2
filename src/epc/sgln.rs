//! Global Location Number with Extension
//!
//! Identifies a physical location (a warehouse, a specific dock door) by
//! combining a company prefix, a location reference, and an extension
//! component that can distinguish sub-locations.
use crate::encoding::{
    bin_to_hex, decode_integer, decode_string, encode_integer, encode_string, hex_to_bin, lpad,
    rpad, uri_decode, uri_encode, BitCursor,
};
use crate::epc::{parse_numeric, partition, set_filter_value, Epc, FILTER_VALUE_BITS, PARTITION_BITS};
use crate::error::{EpcError, Result};
use crate::validation::{is_padded_numbers, is_serial};
use once_cell::sync::Lazy;
use regex::Regex;

const TOTAL_PADDED_DIGITS: usize = 12;
const SGLN96_HEADER: &str = "00110010";
const SGLN195_HEADER: &str = "00111001";
const SGLN96_TOTAL_BITS: usize = 96;
const SGLN195_TOTAL_BITS: usize = 196;
const SGLN96_EXTENSION_BITS: u32 = 41;
const SGLN195_EXTENSION_BITS: u32 = 140;
const MAX_SGLN96_EXTENSION: u64 = 2_199_023_255_551;
const MAX_SGLN195_EXTENSION_LEN: usize = 20;

static URI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^urn:epc:id:sgln:(\d+)\.(\d+)\.(.+)$").unwrap());
static TAG_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^urn:epc:tag:sgln-(96|195):(\d)\.(\d+)\.(\d+)\.(.+)$").unwrap());

/// Which binary layout an [`Sgln`] is encoded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SglnScheme {
    Sgln96,
    Sgln195,
}

/// A Global Location Number with Extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sgln {
    company_prefix: String,
    location_reference: String,
    extension: String,
    filter_value: u8,
    scheme: SglnScheme,
}

impl Sgln {
    /// Build an SGLN from element strings. Defaults to the 96-bit scheme
    /// with filter value 0.
    pub fn create(company_prefix: &str, location_reference: &str, extension: &str) -> Result<Sgln> {
        let sgln = Sgln {
            company_prefix: company_prefix.to_string(),
            location_reference: location_reference.to_string(),
            extension: extension.to_string(),
            filter_value: 0,
            scheme: SglnScheme::Sgln96,
        };
        sgln.validate()?;
        Ok(sgln)
    }

    fn validate(&self) -> Result<()> {
        if !is_padded_numbers(&self.company_prefix) {
            return Err(EpcError::InvalidArgument(
                "company prefix must contain only digits".to_string(),
            ));
        }
        if !is_padded_numbers(&self.location_reference) {
            return Err(EpcError::InvalidArgument(
                "location reference must contain only digits".to_string(),
            ));
        }
        if self.company_prefix.len() + self.location_reference.len() != TOTAL_PADDED_DIGITS {
            return Err(EpcError::InvalidArgument(format!(
                "company prefix and location reference must together total {} digits",
                TOTAL_PADDED_DIGITS
            )));
        }
        if !is_serial(&self.extension) {
            return Err(EpcError::InvalidArgument(
                "extension contains a character outside the EPC serial alphabet".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_extension_for_binary_coding(&self) -> Result<()> {
        let ok = match self.scheme {
            SglnScheme::Sgln96 => {
                is_padded_numbers(&self.extension)
                    && self
                        .extension
                        .parse::<u64>()
                        .map(|v| v <= MAX_SGLN96_EXTENSION)
                        .unwrap_or(false)
            }
            SglnScheme::Sgln195 => {
                is_serial(&self.extension) && self.extension.chars().count() <= MAX_SGLN195_EXTENSION_LEN
            }
        };
        if ok {
            Ok(())
        } else {
            Err(EpcError::InvalidSerial(format!(
                "extension {:?} is not representable under the current SGLN scheme",
                self.extension
            )))
        }
    }

    /// Parse an EPC pure identity URI, e.g. `urn:epc:id:sgln:0614141.12345.400`.
    pub fn create_from_uri(uri: &str) -> Result<Sgln> {
        let caps = URI_RE
            .captures(uri)
            .ok_or_else(|| EpcError::InvalidArgument(format!("{:?} is not a valid SGLN URI", uri)))?;
        Sgln::create(&caps[1], &caps[2], &uri_decode(&caps[3]))
    }

    /// Parse an EPC tag URI, e.g. `urn:epc:tag:sgln-96:3.0614141.12345.400`.
    pub fn create_from_tag_uri(tag_uri: &str) -> Result<Sgln> {
        let caps = TAG_URI_RE.captures(tag_uri).ok_or_else(|| {
            EpcError::InvalidArgument(format!("{:?} is not a valid SGLN tag URI", tag_uri))
        })?;
        let mut sgln = Sgln::create(&caps[3], &caps[4], &uri_decode(&caps[5]))?;
        sgln.scheme = if &caps[1] == "96" {
            SglnScheme::Sgln96
        } else {
            SglnScheme::Sgln195
        };
        let filter: u8 = caps[2].parse().expect("regex captures exactly one digit");
        sgln.set_filter_value(filter)?;
        Ok(sgln)
    }

    /// Decode an EPC binary, as uppercase or lowercase hex.
    pub fn create_from_binary(hex: &str) -> Result<Sgln> {
        let bits = hex_to_bin(hex)?;
        if bits.len() < 8 {
            return Err(EpcError::InvalidArgument(
                "binary is too short to contain a header".to_string(),
            ));
        }
        let (scheme, total_bits) = match &bits[0..8] {
            h if h == SGLN96_HEADER => (SglnScheme::Sgln96, SGLN96_TOTAL_BITS),
            h if h == SGLN195_HEADER => (SglnScheme::Sgln195, SGLN195_TOTAL_BITS),
            h => {
                return Err(EpcError::InvalidArgument(format!(
                    "{} is not a recognised SGLN header",
                    h
                )))
            }
        };
        if bits.len() != total_bits {
            return Err(EpcError::InvalidArgument(format!(
                "SGLN binary must be {} bits, got {}",
                total_bits,
                bits.len()
            )));
        }
        let mut cursor = BitCursor::new(&bits);
        cursor.take(8);
        let filter = decode_integer(cursor.take(FILTER_VALUE_BITS as usize)) as u8;
        let partition_index = decode_integer(cursor.take(PARTITION_BITS as usize)) as u8;
        let row = partition::by_partition(&partition::SGLN_PARTITIONS, partition_index);
        let company_prefix = lpad(
            &decode_integer(cursor.take(row.company_prefix_bits as usize)).to_string(),
            row.company_prefix_digits,
            '0',
        );
        let location_reference = lpad(
            &decode_integer(cursor.take(row.secondary_bits as usize)).to_string(),
            row.secondary_digits,
            '0',
        );
        let extension = match scheme {
            SglnScheme::Sgln96 => decode_integer(cursor.take(SGLN96_EXTENSION_BITS as usize)).to_string(),
            SglnScheme::Sgln195 => decode_string(cursor.take(SGLN195_EXTENSION_BITS as usize)),
        };
        let mut sgln = Sgln::create(&company_prefix, &location_reference, &extension)?;
        sgln.scheme = scheme;
        sgln.set_filter_value(filter)?;
        Ok(sgln)
    }

    pub fn company_prefix(&self) -> &str {
        &self.company_prefix
    }

    pub fn location_reference(&self) -> &str {
        &self.location_reference
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn filter_value(&self) -> u8 {
        self.filter_value
    }

    pub fn set_filter_value(&mut self, value: u8) -> Result<()> {
        set_filter_value(&mut self.filter_value, value)
    }

    pub fn scheme(&self) -> SglnScheme {
        self.scheme
    }

    /// Select the binary scheme. Always succeeds; scheme/extension
    /// compatibility is only checked when [`Epc::get_binary`] is called.
    pub fn set_scheme(&mut self, scheme: SglnScheme) -> Result<()> {
        self.scheme = scheme;
        Ok(())
    }
}

impl Epc for Sgln {
    fn to_uri(&self) -> String {
        format!(
            "urn:epc:id:sgln:{}.{}.{}",
            self.company_prefix,
            self.location_reference,
            uri_encode(&self.extension)
        )
    }

    fn to_tag_uri(&self) -> String {
        let size = match self.scheme {
            SglnScheme::Sgln96 => "96",
            SglnScheme::Sgln195 => "195",
        };
        format!(
            "urn:epc:tag:sgln-{}:{}.{}.{}.{}",
            size,
            self.filter_value,
            self.company_prefix,
            self.location_reference,
            uri_encode(&self.extension)
        )
    }

    fn get_binary(&self) -> Result<String> {
        self.validate_extension_for_binary_coding()?;
        let row = partition::by_company_prefix_digits(&partition::SGLN_PARTITIONS, self.company_prefix.len());
        let mut bits = String::new();
        bits.push_str(match self.scheme {
            SglnScheme::Sgln96 => SGLN96_HEADER,
            SglnScheme::Sgln195 => SGLN195_HEADER,
        });
        bits.push_str(&encode_integer(self.filter_value as u64, FILTER_VALUE_BITS));
        bits.push_str(&encode_integer(row.partition as u64, PARTITION_BITS));
        bits.push_str(&encode_integer(parse_numeric(&self.company_prefix), row.company_prefix_bits));
        bits.push_str(&encode_integer(parse_numeric(&self.location_reference), row.secondary_bits));
        match self.scheme {
            SglnScheme::Sgln96 => {
                bits.push_str(&encode_integer(self.extension.parse().unwrap_or(0), SGLN96_EXTENSION_BITS))
            }
            SglnScheme::Sgln195 => bits.push_str(&encode_string(&self.extension, SGLN195_EXTENSION_BITS)),
        }
        let total_bits = match self.scheme {
            SglnScheme::Sgln96 => SGLN96_TOTAL_BITS,
            SglnScheme::Sgln195 => SGLN195_TOTAL_BITS,
        };
        bin_to_hex(&rpad(&bits, total_bits, '0'))
    }
}
