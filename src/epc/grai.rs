//! Global Returnable Asset Identifier
//!
//! A combination of a company prefix, an asset type assigned by that
//! company, and a serial number which together uniquely identify a
//! specific returnable asset (a pallet, a keg, a tote).
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
const GRAI96_HEADER: &str = "00110011";
const GRAI170_HEADER: &str = "00110111";
const GRAI96_TOTAL_BITS: usize = 96;
const GRAI170_TOTAL_BITS: usize = 172;
const GRAI96_SERIAL_BITS: u32 = 38;
const GRAI170_SERIAL_BITS: u32 = 112;
const MAX_GRAI96_SERIAL: u64 = 274_877_906_943;
const MAX_GRAI170_SERIAL_LEN: usize = 16;

static URI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^urn:epc:id:grai:(\d+)\.(\d+)\.(.+)$").unwrap());
static TAG_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^urn:epc:tag:grai-(96|170):(\d)\.(\d+)\.(\d+)\.(.+)$").unwrap());

/// Which binary layout a [`Grai`] is encoded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraiScheme {
    Grai96,
    Grai170,
}

/// A Global Returnable Asset Identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grai {
    company_prefix: String,
    asset_type: String,
    serial: String,
    filter_value: u8,
    scheme: GraiScheme,
}

impl Grai {
    /// Build a GRAI from element strings. Defaults to the 96-bit scheme
    /// with filter value 0.
    pub fn create(company_prefix: &str, asset_type: &str, serial: &str) -> Result<Grai> {
        let grai = Grai {
            company_prefix: company_prefix.to_string(),
            asset_type: asset_type.to_string(),
            serial: serial.to_string(),
            filter_value: 0,
            scheme: GraiScheme::Grai96,
        };
        grai.validate()?;
        Ok(grai)
    }

    fn validate(&self) -> Result<()> {
        if !is_padded_numbers(&self.company_prefix) {
            return Err(EpcError::InvalidArgument(
                "company prefix must contain only digits".to_string(),
            ));
        }
        if !is_padded_numbers(&self.asset_type) {
            return Err(EpcError::InvalidArgument(
                "asset type must contain only digits".to_string(),
            ));
        }
        if self.company_prefix.len() + self.asset_type.len() != TOTAL_PADDED_DIGITS {
            return Err(EpcError::InvalidArgument(format!(
                "company prefix and asset type must together total {} digits",
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
            GraiScheme::Grai96 => {
                is_padded_numbers(&self.serial)
                    && self
                        .serial
                        .parse::<u64>()
                        .map(|v| v <= MAX_GRAI96_SERIAL)
                        .unwrap_or(false)
            }
            GraiScheme::Grai170 => {
                is_serial(&self.serial) && self.serial.chars().count() <= MAX_GRAI170_SERIAL_LEN
            }
        };
        if ok {
            Ok(())
        } else {
            Err(EpcError::InvalidSerial(format!(
                "serial {:?} is not representable under the current GRAI scheme",
                self.serial
            )))
        }
    }

    /// Parse an EPC pure identity URI, e.g. `urn:epc:id:grai:0614141.12345.400`.
    pub fn create_from_uri(uri: &str) -> Result<Grai> {
        let caps = URI_RE
            .captures(uri)
            .ok_or_else(|| EpcError::InvalidArgument(format!("{:?} is not a valid GRAI URI", uri)))?;
        Grai::create(&caps[1], &caps[2], &uri_decode(&caps[3]))
    }

    /// Parse an EPC tag URI, e.g. `urn:epc:tag:grai-96:3.0614141.12345.400`.
    pub fn create_from_tag_uri(tag_uri: &str) -> Result<Grai> {
        let caps = TAG_URI_RE.captures(tag_uri).ok_or_else(|| {
            EpcError::InvalidArgument(format!("{:?} is not a valid GRAI tag URI", tag_uri))
        })?;
        let mut grai = Grai::create(&caps[3], &caps[4], &uri_decode(&caps[5]))?;
        grai.scheme = if &caps[1] == "96" {
            GraiScheme::Grai96
        } else {
            GraiScheme::Grai170
        };
        let filter: u8 = caps[2].parse().expect("regex captures exactly one digit");
        grai.set_filter_value(filter)?;
        Ok(grai)
    }

    /// Decode an EPC binary, as uppercase or lowercase hex.
    pub fn create_from_binary(hex: &str) -> Result<Grai> {
        let bits = hex_to_bin(hex)?;
        if bits.len() < 8 {
            return Err(EpcError::InvalidArgument(
                "binary is too short to contain a header".to_string(),
            ));
        }
        let (scheme, total_bits) = match &bits[0..8] {
            h if h == GRAI96_HEADER => (GraiScheme::Grai96, GRAI96_TOTAL_BITS),
            h if h == GRAI170_HEADER => (GraiScheme::Grai170, GRAI170_TOTAL_BITS),
            h => {
                return Err(EpcError::InvalidArgument(format!(
                    "{} is not a recognised GRAI header",
                    h
                )))
            }
        };
        if bits.len() != total_bits {
            return Err(EpcError::InvalidArgument(format!(
                "GRAI binary must be {} bits, got {}",
                total_bits,
                bits.len()
            )));
        }
        let mut cursor = BitCursor::new(&bits);
        cursor.take(8);
        let filter = decode_integer(cursor.take(FILTER_VALUE_BITS as usize)) as u8;
        let partition_index = decode_integer(cursor.take(PARTITION_BITS as usize)) as u8;
        let row = partition::by_partition(&partition::GRAI_PARTITIONS, partition_index);
        let company_prefix = lpad(
            &decode_integer(cursor.take(row.company_prefix_bits as usize)).to_string(),
            row.company_prefix_digits,
            '0',
        );
        let asset_type = lpad(
            &decode_integer(cursor.take(row.secondary_bits as usize)).to_string(),
            row.secondary_digits,
            '0',
        );
        let serial = match scheme {
            GraiScheme::Grai96 => decode_integer(cursor.take(GRAI96_SERIAL_BITS as usize)).to_string(),
            GraiScheme::Grai170 => decode_string(cursor.take(GRAI170_SERIAL_BITS as usize)),
        };
        let mut grai = Grai::create(&company_prefix, &asset_type, &serial)?;
        grai.scheme = scheme;
        grai.set_filter_value(filter)?;
        Ok(grai)
    }

    pub fn company_prefix(&self) -> &str {
        &self.company_prefix
    }

    pub fn asset_type(&self) -> &str {
        &self.asset_type
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

    pub fn scheme(&self) -> GraiScheme {
        self.scheme
    }

    /// Select the binary scheme. Always succeeds; scheme/serial
    /// compatibility is only checked when [`Epc::get_binary`] is called.
    pub fn set_scheme(&mut self, scheme: GraiScheme) -> Result<()> {
        self.scheme = scheme;
        Ok(())
    }
}

impl Epc for Grai {
    fn to_uri(&self) -> String {
        format!(
            "urn:epc:id:grai:{}.{}.{}",
            self.company_prefix,
            self.asset_type,
            uri_encode(&self.serial)
        )
    }

    fn to_tag_uri(&self) -> String {
        let size = match self.scheme {
            GraiScheme::Grai96 => "96",
            GraiScheme::Grai170 => "170",
        };
        format!(
            "urn:epc:tag:grai-{}:{}.{}.{}.{}",
            size,
            self.filter_value,
            self.company_prefix,
            self.asset_type,
            uri_encode(&self.serial)
        )
    }

    fn get_binary(&self) -> Result<String> {
        self.validate_serial_for_binary_coding()?;
        let row = partition::by_company_prefix_digits(&partition::GRAI_PARTITIONS, self.company_prefix.len());
        let mut bits = String::new();
        bits.push_str(match self.scheme {
            GraiScheme::Grai96 => GRAI96_HEADER,
            GraiScheme::Grai170 => GRAI170_HEADER,
        });
        bits.push_str(&encode_integer(self.filter_value as u64, FILTER_VALUE_BITS));
        bits.push_str(&encode_integer(row.partition as u64, PARTITION_BITS));
        bits.push_str(&encode_integer(parse_numeric(&self.company_prefix), row.company_prefix_bits));
        bits.push_str(&encode_integer(parse_numeric(&self.asset_type), row.secondary_bits));
        match self.scheme {
            GraiScheme::Grai96 => {
                bits.push_str(&encode_integer(self.serial.parse().unwrap_or(0), GRAI96_SERIAL_BITS))
            }
            GraiScheme::Grai170 => bits.push_str(&encode_string(&self.serial, GRAI170_SERIAL_BITS)),
        }
        let total_bits = match self.scheme {
            GraiScheme::Grai96 => GRAI96_TOTAL_BITS,
            GraiScheme::Grai170 => GRAI170_TOTAL_BITS,
        };
        bin_to_hex(&rpad(&bits, total_bits, '0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_bad_digit_sum() {
        assert!(Grai::create("0614141", "123456", "400").is_err());
    }

    #[test]
    fn uri_round_trip() {
        let grai = Grai::create("0614141", "12345", "400").unwrap();
        assert_eq!(grai.to_uri(), "urn:epc:id:grai:0614141.12345.400");
        assert_eq!(Grai::create_from_uri(&grai.to_uri()).unwrap(), grai);
    }

    #[test]
    fn binary_round_trip_96() {
        let grai = Grai::create("0614141", "12345", "400").unwrap();
        let hex = grai.get_binary().unwrap();
        assert_eq!(Grai::create_from_binary(&hex).unwrap(), grai);
    }

    #[test]
    fn binary_round_trip_170_with_alphanumeric_serial() {
        let mut grai = Grai::create("0614141", "12345", "ab-400").unwrap();
        grai.set_scheme(GraiScheme::Grai170).unwrap();
        let hex = grai.get_binary().unwrap();
        let decoded = Grai::create_from_binary(&hex).unwrap();
        assert_eq!(decoded.serial(), "ab-400");
        assert_eq!(decoded.scheme(), GraiScheme::Grai170);
    }

    #[test]
    fn serial_too_long_for_170_is_invalid() {
        let mut grai = Grai::create("0614141", "12345", "a".repeat(17).as_str()).unwrap();
        grai.set_scheme(GraiScheme::Grai170).unwrap();
        assert!(matches!(grai.get_binary(), Err(EpcError::InvalidSerial(_))));
    }
}
