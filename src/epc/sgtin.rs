//! Serialised Global Trade Item Number
//!
//! A combination of a GTIN (split into company prefix and indicator/item
//! reference) and a serial number which together uniquely identify a
//! specific item, as opposed to an item type.
use crate::encoding::{
    bin_to_hex, decode_integer, decode_string, encode_integer, encode_string, hex_to_bin, lpad,
    rpad, uri_decode, uri_encode, BitCursor,
};
use crate::epc::{parse_numeric, partition, set_filter_value, Epc, FILTER_VALUE_BITS, PARTITION_BITS};
use crate::error::{EpcError, Result};
use crate::validation::{is_padded_numbers, is_serial};
use once_cell::sync::Lazy;
use regex::Regex;

const TOTAL_PADDED_DIGITS: usize = 13;
const SGTIN96_HEADER: &str = "00110000";
const SGTIN198_HEADER: &str = "00110110";
const SGTIN96_TOTAL_BITS: usize = 96;
const SGTIN198_TOTAL_BITS: usize = 208;
const SGTIN96_SERIAL_BITS: u32 = 38;
const SGTIN198_SERIAL_BITS: u32 = 140;
const MAX_SGTIN96_SERIAL: u64 = 274_877_906_943;
const MAX_SGTIN198_SERIAL_LEN: usize = 20;

static URI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^urn:epc:id:sgtin:(\d+)\.(\d+)\.(.+)$").unwrap());
static TAG_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^urn:epc:tag:sgtin-(96|198):(\d)\.(\d+)\.(\d+)\.(.+)$").unwrap());

/// Which binary layout an [`Sgtin`] is encoded under. Determines whether
/// `serial` must be numeric (96) or may be alphanumeric (198).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgtinScheme {
    Sgtin96,
    Sgtin198,
}

/// A Serialised Global Trade Item Number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sgtin {
    company_prefix: String,
    item_reference_and_indicator: String,
    serial: String,
    filter_value: u8,
    scheme: SgtinScheme,
}

impl Sgtin {
    /// Build an SGTIN from element strings. `item_reference_and_indicator`
    /// carries the GTIN indicator digit as its leading character. Defaults
    /// to the 96-bit scheme with filter value 0.
    pub fn create(
        company_prefix: &str,
        item_reference_and_indicator: &str,
        serial: &str,
    ) -> Result<Sgtin> {
        let sgtin = Sgtin {
            company_prefix: company_prefix.to_string(),
            item_reference_and_indicator: item_reference_and_indicator.to_string(),
            serial: serial.to_string(),
            filter_value: 0,
            scheme: SgtinScheme::Sgtin96,
        };
        sgtin.validate()?;
        Ok(sgtin)
    }

    fn validate(&self) -> Result<()> {
        if !is_padded_numbers(&self.company_prefix) {
            return Err(EpcError::InvalidArgument(
                "company prefix must contain only digits".to_string(),
            ));
        }
        if !is_padded_numbers(&self.item_reference_and_indicator) {
            return Err(EpcError::InvalidArgument(
                "item reference and indicator must contain only digits".to_string(),
            ));
        }
        if self.company_prefix.len() + self.item_reference_and_indicator.len() != TOTAL_PADDED_DIGITS {
            return Err(EpcError::InvalidArgument(format!(
                "company prefix and item reference/indicator must together total {} digits",
                TOTAL_PADDED_DIGITS
            )));
        }
        if !is_serial(&self.serial) {
            return Err(EpcError::InvalidArgument(
                "serial contains a character outside the EPC serial alphabet".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_serial_for_binary_coding(&self) -> Result<()> {
        let ok = match self.scheme {
            SgtinScheme::Sgtin96 => {
                is_padded_numbers(&self.serial)
                    && self
                        .serial
                        .parse::<u64>()
                        .map(|v| v <= MAX_SGTIN96_SERIAL)
                        .unwrap_or(false)
            }
            SgtinScheme::Sgtin198 => {
                is_serial(&self.serial) && self.serial.chars().count() <= MAX_SGTIN198_SERIAL_LEN
            }
        };
        if ok {
            Ok(())
        } else {
            Err(EpcError::InvalidSerial(format!(
                "serial {:?} is not representable under the current SGTIN scheme",
                self.serial
            )))
        }
    }

    /// Parse an EPC pure identity URI, e.g.
    /// `urn:epc:id:sgtin:0614141.812345.6789`.
    pub fn create_from_uri(uri: &str) -> Result<Sgtin> {
        let caps = URI_RE
            .captures(uri)
            .ok_or_else(|| EpcError::InvalidArgument(format!("{:?} is not a valid SGTIN URI", uri)))?;
        Sgtin::create(&caps[1], &caps[2], &uri_decode(&caps[3]))
    }

    /// Parse an EPC tag URI, e.g. `urn:epc:tag:sgtin-96:3.0614141.812345.6789`.
    pub fn create_from_tag_uri(tag_uri: &str) -> Result<Sgtin> {
        let caps = TAG_URI_RE.captures(tag_uri).ok_or_else(|| {
            EpcError::InvalidArgument(format!("{:?} is not a valid SGTIN tag URI", tag_uri))
        })?;
        let mut sgtin = Sgtin::create(&caps[3], &caps[4], &uri_decode(&caps[5]))?;
        sgtin.scheme = if &caps[1] == "96" {
            SgtinScheme::Sgtin96
        } else {
            SgtinScheme::Sgtin198
        };
        let filter: u8 = caps[2].parse().expect("regex captures exactly one digit");
        sgtin.set_filter_value(filter)?;
        Ok(sgtin)
    }

    /// Decode an EPC binary, as uppercase or lowercase hex, choosing the
    /// scheme from its header.
    pub fn create_from_binary(hex: &str) -> Result<Sgtin> {
        let bits = hex_to_bin(hex)?;
        if bits.len() < 8 {
            return Err(EpcError::InvalidArgument(
                "binary is too short to contain a header".to_string(),
            ));
        }
        let (scheme, total_bits) = match &bits[0..8] {
            h if h == SGTIN96_HEADER => (SgtinScheme::Sgtin96, SGTIN96_TOTAL_BITS),
            h if h == SGTIN198_HEADER => (SgtinScheme::Sgtin198, SGTIN198_TOTAL_BITS),
            h => {
                return Err(EpcError::InvalidArgument(format!(
                    "{} is not a recognised SGTIN header",
                    h
                )))
            }
        };
        if bits.len() != total_bits {
            return Err(EpcError::InvalidArgument(format!(
                "SGTIN binary must be {} bits, got {}",
                total_bits,
                bits.len()
            )));
        }
        let mut cursor = BitCursor::new(&bits);
        cursor.take(8);
        let filter = decode_integer(cursor.take(FILTER_VALUE_BITS as usize)) as u8;
        let partition_index = decode_integer(cursor.take(PARTITION_BITS as usize)) as u8;
        let row = partition::by_partition(&partition::SGTIN_PARTITIONS, partition_index);
        let company_prefix = lpad(
            &decode_integer(cursor.take(row.company_prefix_bits as usize)).to_string(),
            row.company_prefix_digits,
            '0',
        );
        let item_reference_and_indicator = lpad(
            &decode_integer(cursor.take(row.secondary_bits as usize)).to_string(),
            row.secondary_digits,
            '0',
        );
        let serial = match scheme {
            SgtinScheme::Sgtin96 => decode_integer(cursor.take(SGTIN96_SERIAL_BITS as usize)).to_string(),
            SgtinScheme::Sgtin198 => decode_string(cursor.take(SGTIN198_SERIAL_BITS as usize)),
        };
        let mut sgtin = Sgtin::create(&company_prefix, &item_reference_and_indicator, &serial)?;
        sgtin.scheme = scheme;
        sgtin.set_filter_value(filter)?;
        Ok(sgtin)
    }

    pub fn company_prefix(&self) -> &str {
        &self.company_prefix
    }

    pub fn item_reference_and_indicator(&self) -> &str {
        &self.item_reference_and_indicator
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn filter_value(&self) -> u8 {
        self.filter_value
    }

    pub fn set_filter_value(&mut self, value: u8) -> Result<()> {
        set_filter_value(&mut self.filter_value, value)
    }

    pub fn scheme(&self) -> SgtinScheme {
        self.scheme
    }

    /// Select the binary scheme. Always succeeds; scheme/serial
    /// compatibility is only checked when [`Epc::get_binary`] is called.
    pub fn set_scheme(&mut self, scheme: SgtinScheme) -> Result<()> {
        self.scheme = scheme;
        Ok(())
    }
}

impl Epc for Sgtin {
    fn to_uri(&self) -> String {
        format!(
            "urn:epc:id:sgtin:{}.{}.{}",
            self.company_prefix,
            self.item_reference_and_indicator,
            uri_encode(&self.serial)
        )
    }

    fn to_tag_uri(&self) -> String {
        let size = match self.scheme {
            SgtinScheme::Sgtin96 => "96",
            SgtinScheme::Sgtin198 => "198",
        };
        format!(
            "urn:epc:tag:sgtin-{}:{}.{}.{}.{}",
            size,
            self.filter_value,
            self.company_prefix,
            self.item_reference_and_indicator,
            uri_encode(&self.serial)
        )
    }

    fn get_binary(&self) -> Result<String> {
        self.validate_serial_for_binary_coding()?;
        let row = partition::by_company_prefix_digits(&partition::SGTIN_PARTITIONS, self.company_prefix.len());
        let mut bits = String::new();
        bits.push_str(match self.scheme {
            SgtinScheme::Sgtin96 => SGTIN96_HEADER,
            SgtinScheme::Sgtin198 => SGTIN198_HEADER,
        });
        bits.push_str(&encode_integer(self.filter_value as u64, FILTER_VALUE_BITS));
        bits.push_str(&encode_integer(row.partition as u64, PARTITION_BITS));
        bits.push_str(&encode_integer(parse_numeric(&self.company_prefix), row.company_prefix_bits));
        bits.push_str(&encode_integer(
            parse_numeric(&self.item_reference_and_indicator),
            row.secondary_bits,
        ));
        match self.scheme {
            SgtinScheme::Sgtin96 => {
                bits.push_str(&encode_integer(self.serial.parse().unwrap_or(0), SGTIN96_SERIAL_BITS))
            }
            SgtinScheme::Sgtin198 => bits.push_str(&encode_string(&self.serial, SGTIN198_SERIAL_BITS)),
        }
        let total_bits = match self.scheme {
            SgtinScheme::Sgtin96 => SGTIN96_TOTAL_BITS,
            SgtinScheme::Sgtin198 => SGTIN198_TOTAL_BITS,
        };
        bin_to_hex(&rpad(&bits, total_bits, '0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_bad_digit_sum() {
        assert!(Sgtin::create("0614141", "8123456", "6789").is_err());
    }

    #[test]
    fn create_rejects_non_numeric_company_prefix() {
        assert!(Sgtin::create("061414A", "812345", "6789").is_err());
    }

    #[test]
    fn uri_round_trip() {
        let sgtin = Sgtin::create("0614141", "812345", "6789").unwrap();
        assert_eq!(sgtin.to_uri(), "urn:epc:id:sgtin:0614141.812345.6789");
        let parsed = Sgtin::create_from_uri(&sgtin.to_uri()).unwrap();
        assert_eq!(parsed, sgtin);
    }

    #[test]
    fn tag_uri_parses_scheme_and_filter() {
        let sgtin = Sgtin::create_from_tag_uri("urn:epc:tag:sgtin-198:3.0614141.712345.32a%2Fb").unwrap();
        assert_eq!(sgtin.scheme(), SgtinScheme::Sgtin198);
        assert_eq!(sgtin.filter_value(), 3);
        assert_eq!(sgtin.serial(), "32a/b");
    }

    #[test]
    fn tag_uri_rejects_filter_above_seven() {
        assert!(Sgtin::create_from_tag_uri("urn:epc:tag:sgtin-96:9.0614141.812345.6789").is_err());
    }

    #[test]
    fn binary_round_trip_96() {
        let hex = "3074257BF7194E4000001A85";
        let sgtin = Sgtin::create_from_binary(hex).unwrap();
        assert_eq!(sgtin.to_uri(), "urn:epc:id:sgtin:0614141.812345.6789");
        assert_eq!(sgtin.get_binary().unwrap(), hex);
    }

    #[test]
    fn serial_above_max_is_invalid_for_96() {
        let mut sgtin = Sgtin::create("0614141", "812345", "274877906944").unwrap();
        sgtin.set_scheme(SgtinScheme::Sgtin96).unwrap();
        assert!(matches!(sgtin.get_binary(), Err(EpcError::InvalidSerial(_))));
    }

    #[test]
    fn max_serial_encodes_for_96() {
        let mut sgtin = Sgtin::create("0614141", "812345", "274877906943").unwrap();
        sgtin.set_scheme(SgtinScheme::Sgtin96).unwrap();
        assert!(sgtin.get_binary().is_ok());
    }

    #[test]
    fn alphanumeric_serial_invalid_for_96_scheme() {
        let mut sgtin = Sgtin::create("0614141", "812345", "abc").unwrap();
        sgtin.set_scheme(SgtinScheme::Sgtin96).unwrap();
        assert!(matches!(sgtin.get_binary(), Err(EpcError::InvalidSerial(_))));
    }
}
