//! Serial Shipping Container Code
//!
//! Identifies a logistics unit (a pallet, a shipping container) rather than
//! a trade item. Only one binary scheme exists (SSCC-96); its binary is
//! always padded to 96 bits regardless of how many bits the partition row
//! assigns the company prefix and serial reference.
use crate::encoding::{bin_to_hex, decode_integer, encode_integer, hex_to_bin, lpad, rpad, BitCursor};
use crate::epc::{parse_numeric, partition, set_filter_value, Epc, FILTER_VALUE_BITS, PARTITION_BITS};
use crate::error::{EpcError, Result};
use crate::validation::is_padded_numbers;
use once_cell::sync::Lazy;
use regex::Regex;

const TOTAL_PADDED_DIGITS: usize = 17;
const HEADER: &str = "00110001";
const TOTAL_BITS: usize = 96;

static URI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^urn:epc:id:sscc:(\d+)\.(\d+)$").unwrap());
static TAG_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^urn:epc:tag:sscc-96:(\d)\.(\d+)\.(\d+)$").unwrap());

/// A Serial Shipping Container Code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sscc {
    company_prefix: String,
    serial_reference: String,
    filter_value: u8,
}

impl Sscc {
    /// Build an SSCC from element strings. Defaults to filter value 0.
    pub fn create(company_prefix: &str, serial_reference: &str) -> Result<Sscc> {
        let sscc = Sscc {
            company_prefix: company_prefix.to_string(),
            serial_reference: serial_reference.to_string(),
            filter_value: 0,
        };
        sscc.validate()?;
        Ok(sscc)
    }

    fn validate(&self) -> Result<()> {
        if !is_padded_numbers(&self.company_prefix) {
            return Err(EpcError::InvalidArgument(
                "company prefix must contain only digits".to_string(),
            ));
        }
        if !is_padded_numbers(&self.serial_reference) {
            return Err(EpcError::InvalidArgument(
                "serial reference must contain only digits".to_string(),
            ));
        }
        if self.company_prefix.len() + self.serial_reference.len() != TOTAL_PADDED_DIGITS {
            return Err(EpcError::InvalidArgument(format!(
                "company prefix and serial reference must together total {} digits",
                TOTAL_PADDED_DIGITS
            )));
        }
        Ok(())
    }

    /// Parse an EPC pure identity URI, e.g. `urn:epc:id:sscc:0614141.1234567890`.
    pub fn create_from_uri(uri: &str) -> Result<Sscc> {
        let caps = URI_RE
            .captures(uri)
            .ok_or_else(|| EpcError::InvalidArgument(format!("{:?} is not a valid SSCC URI", uri)))?;
        Sscc::create(&caps[1], &caps[2])
    }

    /// Parse an EPC tag URI, e.g. `urn:epc:tag:sscc-96:3.0614141.1234567890`.
    pub fn create_from_tag_uri(tag_uri: &str) -> Result<Sscc> {
        let caps = TAG_URI_RE.captures(tag_uri).ok_or_else(|| {
            EpcError::InvalidArgument(format!("{:?} is not a valid SSCC tag URI", tag_uri))
        })?;
        let mut sscc = Sscc::create(&caps[2], &caps[3])?;
        let filter: u8 = caps[1].parse().expect("regex captures exactly one digit");
        sscc.set_filter_value(filter)?;
        Ok(sscc)
    }

    /// Decode an EPC binary, as uppercase or lowercase hex.
    pub fn create_from_binary(hex: &str) -> Result<Sscc> {
        let bits = hex_to_bin(hex)?;
        if bits.len() != TOTAL_BITS || &bits[0..8] != HEADER {
            return Err(EpcError::InvalidArgument(format!(
                "binary is not a valid SSCC-96 ({} bits, expected {})",
                bits.len(),
                TOTAL_BITS
            )));
        }
        let mut cursor = BitCursor::new(&bits);
        cursor.take(8);
        let filter = decode_integer(cursor.take(FILTER_VALUE_BITS as usize)) as u8;
        let partition_index = decode_integer(cursor.take(PARTITION_BITS as usize)) as u8;
        let row = partition::by_partition(&partition::SSCC_PARTITIONS, partition_index);
        let company_prefix = lpad(
            &decode_integer(cursor.take(row.company_prefix_bits as usize)).to_string(),
            row.company_prefix_digits,
            '0',
        );
        let serial_reference = lpad(
            &decode_integer(cursor.take(row.secondary_bits as usize)).to_string(),
            row.secondary_digits,
            '0',
        );
        let mut sscc = Sscc::create(&company_prefix, &serial_reference)?;
        sscc.set_filter_value(filter)?;
        Ok(sscc)
    }

    pub fn company_prefix(&self) -> &str {
        &self.company_prefix
    }

    pub fn serial_reference(&self) -> &str {
        &self.serial_reference
    }

    pub fn filter_value(&self) -> u8 {
        self.filter_value
    }

    pub fn set_filter_value(&mut self, value: u8) -> Result<()> {
        set_filter_value(&mut self.filter_value, value)
    }
}

impl Epc for Sscc {
    fn to_uri(&self) -> String {
        format!("urn:epc:id:sscc:{}.{}", self.company_prefix, self.serial_reference)
    }

    fn to_tag_uri(&self) -> String {
        format!(
            "urn:epc:tag:sscc-96:{}.{}.{}",
            self.filter_value, self.company_prefix, self.serial_reference
        )
    }

    fn get_binary(&self) -> Result<String> {
        let row = partition::by_company_prefix_digits(&partition::SSCC_PARTITIONS, self.company_prefix.len());
        let mut bits = String::new();
        bits.push_str(HEADER);
        bits.push_str(&encode_integer(self.filter_value as u64, FILTER_VALUE_BITS));
        bits.push_str(&encode_integer(row.partition as u64, PARTITION_BITS));
        bits.push_str(&encode_integer(parse_numeric(&self.company_prefix), row.company_prefix_bits));
        bits.push_str(&encode_integer(parse_numeric(&self.serial_reference), row.secondary_bits));
        bin_to_hex(&rpad(&bits, TOTAL_BITS, '0'))
    }
}
