//! Global Individual Asset Identifier
//!
//! Identifies a single asset a company wants to track (a forklift, a
//! reusable crate) by combining a company prefix with an asset reference.
//! Unlike the other four families, GIAI has only one padded-numeric field:
//! there's no fixed digit-count invariant to check, and the asset reference
//! field's bit width itself varies with the chosen partition rather than
//! sitting in a fixed-width trailer.
use crate::encoding::{
    bin_to_hex, decode_integer, decode_string, encode_integer, encode_string, hex_to_bin, lpad,
    rpad, uri_decode, uri_encode, BitCursor,
};
use crate::epc::partition::{self, PartitionRow};
use crate::epc::{parse_numeric, set_filter_value, Epc, FILTER_VALUE_BITS, PARTITION_BITS};
use crate::error::{EpcError, Result};
use crate::validation::{is_padded_numbers, is_serial};
use once_cell::sync::Lazy;
use regex::Regex;

const GIAI96_HEADER: &str = "00110100";
const GIAI202_HEADER: &str = "00111000";
const GIAI96_TOTAL_BITS: usize = 96;
const GIAI202_TOTAL_BITS: usize = 208;

static URI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^urn:epc:id:giai:(\d+)\.(.+)$").unwrap());
static TAG_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^urn:epc:tag:giai-(96|202):(\d)\.(\d+)\.(.+)$").unwrap());

/// Which binary layout a [`Giai`] is encoded under. Unlike the other
/// families' two schemes, a GIAI's two schemes also key into two distinct
/// partition tables (`GIAI96_PARTITIONS`/`GIAI202_PARTITIONS`), since the
/// asset reference has no fixed bit width shared across schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiaiScheme {
    Giai96,
    Giai202,
}

fn partition_table_for(scheme: GiaiScheme) -> &'static [PartitionRow; 7] {
    match scheme {
        GiaiScheme::Giai96 => &partition::GIAI96_PARTITIONS,
        GiaiScheme::Giai202 => &partition::GIAI202_PARTITIONS,
    }
}

/// A Global Individual Asset Identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Giai {
    company_prefix: String,
    asset_reference: String,
    filter_value: u8,
    scheme: GiaiScheme,
}

impl Giai {
    /// Build a GIAI from element strings. Defaults to the 96-bit scheme
    /// with filter value 0.
    pub fn create(company_prefix: &str, asset_reference: &str) -> Result<Giai> {
        let giai = Giai {
            company_prefix: company_prefix.to_string(),
            asset_reference: asset_reference.to_string(),
            filter_value: 0,
            scheme: GiaiScheme::Giai96,
        };
        giai.validate()?;
        Ok(giai)
    }

    fn validate(&self) -> Result<()> {
        if !is_padded_numbers(&self.company_prefix) {
            return Err(EpcError::InvalidArgument(
                "company prefix must contain only digits".to_string(),
            ));
        }
        if !is_serial(&self.asset_reference) {
            return Err(EpcError::InvalidArgument(
                "asset reference contains a character outside the EPC serial alphabet".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_asset_reference_for_binary_coding(&self) -> Result<()> {
        // The secondary field's bit (and character) budget depends on which
        // partition row the current company prefix falls into, so the
        // Giai202 character ceiling has to come from that row rather than
        // from a single constant (the row for a 12-digit company prefix
        // leaves room for only 18 characters, not the row-6 maximum of 24).
        let row = partition::by_company_prefix_digits(
            partition_table_for(self.scheme),
            self.company_prefix.len(),
        );
        let ok = match self.scheme {
            // No upper bound on the numeric value here: the field's bit
            // width varies by partition, so there's no single constant to
            // check it against.
            GiaiScheme::Giai96 => is_padded_numbers(&self.asset_reference),
            GiaiScheme::Giai202 => {
                is_serial(&self.asset_reference)
                    && self.asset_reference.chars().count() <= row.secondary_digits
            }
        };
        if ok {
            Ok(())
        } else {
            Err(EpcError::InvalidSerial(format!(
                "asset reference {:?} is not representable under the current GIAI scheme",
                self.asset_reference
            )))
        }
    }

    /// Parse an EPC pure identity URI, e.g. `urn:epc:id:giai:0614141.32a/b`.
    pub fn create_from_uri(uri: &str) -> Result<Giai> {
        let caps = URI_RE
            .captures(uri)
            .ok_or_else(|| EpcError::InvalidArgument(format!("{:?} is not a valid GIAI URI", uri)))?;
        Giai::create(&caps[1], &uri_decode(&caps[2]))
    }

    /// Parse an EPC tag URI, e.g. `urn:epc:tag:giai-96:3.0614141.32a/b`.
    pub fn create_from_tag_uri(tag_uri: &str) -> Result<Giai> {
        let caps = TAG_URI_RE.captures(tag_uri).ok_or_else(|| {
            EpcError::InvalidArgument(format!("{:?} is not a valid GIAI tag URI", tag_uri))
        })?;
        let mut giai = Giai::create(&caps[3], &uri_decode(&caps[4]))?;
        giai.scheme = if &caps[1] == "96" {
            GiaiScheme::Giai96
        } else {
            GiaiScheme::Giai202
        };
        let filter: u8 = caps[2].parse().expect("regex captures exactly one digit");
        giai.set_filter_value(filter)?;
        Ok(giai)
    }

    /// Decode an EPC binary, as uppercase or lowercase hex.
    pub fn create_from_binary(hex: &str) -> Result<Giai> {
        let bits = hex_to_bin(hex)?;
        if bits.len() < 8 {
            return Err(EpcError::InvalidArgument(
                "binary is too short to contain a header".to_string(),
            ));
        }
        let (scheme, total_bits) = match &bits[0..8] {
            h if h == GIAI96_HEADER => (GiaiScheme::Giai96, GIAI96_TOTAL_BITS),
            h if h == GIAI202_HEADER => (GiaiScheme::Giai202, GIAI202_TOTAL_BITS),
            h => {
                return Err(EpcError::InvalidArgument(format!(
                    "{} is not a recognised GIAI header",
                    h
                )))
            }
        };
        if bits.len() != total_bits {
            return Err(EpcError::InvalidArgument(format!(
                "GIAI binary must be {} bits, got {}",
                total_bits,
                bits.len()
            )));
        }
        let mut cursor = BitCursor::new(&bits);
        cursor.take(8);
        let filter = decode_integer(cursor.take(FILTER_VALUE_BITS as usize)) as u8;
        let partition_index = decode_integer(cursor.take(PARTITION_BITS as usize)) as u8;
        let row = partition::by_partition(partition_table_for(scheme), partition_index);
        let company_prefix = lpad(
            &decode_integer(cursor.take(row.company_prefix_bits as usize)).to_string(),
            row.company_prefix_digits,
            '0',
        );
        let asset_reference = match scheme {
            GiaiScheme::Giai96 => {
                lpad(
                    &decode_integer(cursor.take(row.secondary_bits as usize)).to_string(),
                    row.secondary_digits,
                    '0',
                )
            }
            GiaiScheme::Giai202 => decode_string(cursor.take(row.secondary_bits as usize)),
        };
        let mut giai = Giai::create(&company_prefix, &asset_reference)?;
        giai.scheme = scheme;
        giai.set_filter_value(filter)?;
        Ok(giai)
    }

    pub fn company_prefix(&self) -> &str {
        &self.company_prefix
    }

    pub fn asset_reference(&self) -> &str {
        &self.asset_reference
    }

    pub fn filter_value(&self) -> u8 {
        self.filter_value
    }

    pub fn set_filter_value(&mut self, value: u8) -> Result<()> {
        set_filter_value(&mut self.filter_value, value)
    }

    pub fn scheme(&self) -> GiaiScheme {
        self.scheme
    }

    /// Select the binary scheme. Always succeeds; scheme/asset-reference
    /// compatibility is only checked when [`Epc::get_binary`] is called.
    pub fn set_scheme(&mut self, scheme: GiaiScheme) -> Result<()> {
        self.scheme = scheme;
        Ok(())
    }
}

impl Epc for Giai {
    fn to_uri(&self) -> String {
        format!("urn:epc:id:giai:{}.{}", self.company_prefix, uri_encode(&self.asset_reference))
    }

    fn to_tag_uri(&self) -> String {
        let size = match self.scheme {
            GiaiScheme::Giai96 => "96",
            GiaiScheme::Giai202 => "202",
        };
        format!(
            "urn:epc:tag:giai-{}:{}.{}.{}",
            size,
            self.filter_value,
            self.company_prefix,
            uri_encode(&self.asset_reference)
        )
    }

    fn get_binary(&self) -> Result<String> {
        self.validate_asset_reference_for_binary_coding()?;
        let table = partition_table_for(self.scheme);
        let row = partition::by_company_prefix_digits(table, self.company_prefix.len());
        let mut bits = String::new();
        bits.push_str(match self.scheme {
            GiaiScheme::Giai96 => GIAI96_HEADER,
            GiaiScheme::Giai202 => GIAI202_HEADER,
        });
        bits.push_str(&encode_integer(self.filter_value as u64, FILTER_VALUE_BITS));
        bits.push_str(&encode_integer(row.partition as u64, PARTITION_BITS));
        bits.push_str(&encode_integer(parse_numeric(&self.company_prefix), row.company_prefix_bits));
        match self.scheme {
            GiaiScheme::Giai96 => bits.push_str(&encode_integer(parse_numeric(&self.asset_reference), row.secondary_bits)),
            GiaiScheme::Giai202 => bits.push_str(&encode_string(&self.asset_reference, row.secondary_bits)),
        }
        let total_bits = match self.scheme {
            GiaiScheme::Giai96 => GIAI96_TOTAL_BITS,
            GiaiScheme::Giai202 => GIAI202_TOTAL_BITS,
        };
        bin_to_hex(&rpad(&bits, total_bits, '0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_non_numeric_company_prefix() {
        assert!(Giai::create("061414A", "400").is_err());
    }

    #[test]
    fn create_rejects_invalid_asset_reference() {
        let err = Giai::create("0614141", "32a%2Fb\x20").unwrap_err();
        assert!(matches!(err, EpcError::InvalidArgument(_)));
    }

    #[test]
    fn uri_round_trip() {
        let giai = Giai::create("0614141", "32a/b").unwrap();
        assert_eq!(giai.to_uri(), "urn:epc:id:giai:0614141.32a%2Fb");
        assert_eq!(Giai::create_from_uri(&giai.to_uri()).unwrap(), giai);
    }

    #[test]
    fn binary_round_trip_96() {
        let giai = Giai::create("0614141", "12345").unwrap();
        let hex = giai.get_binary().unwrap();
        assert_eq!(Giai::create_from_binary(&hex).unwrap(), giai);
    }

    #[test]
    fn binary_round_trip_202_with_alphanumeric_asset_reference() {
        let mut giai = Giai::create("0614141", "ab-12345").unwrap();
        giai.set_scheme(GiaiScheme::Giai202).unwrap();
        let hex = giai.get_binary().unwrap();
        let decoded = Giai::create_from_binary(&hex).unwrap();
        assert_eq!(decoded.asset_reference(), "ab-12345");
        assert_eq!(decoded.scheme(), GiaiScheme::Giai202);
    }

    #[test]
    fn asset_reference_too_long_for_202_is_invalid() {
        let mut giai = Giai::create("0614141", "a".repeat(25).as_str()).unwrap();
        giai.set_scheme(GiaiScheme::Giai202).unwrap();
        assert!(matches!(giai.get_binary(), Err(EpcError::InvalidSerial(_))));
    }

    #[test]
    fn asset_reference_too_long_for_its_own_partition_row_is_invalid() {
        // A 12-digit company prefix is partition 0, whose row only allows an
        // 18-character asset reference, even though the narrowest company
        // prefix (partition 6) allows 24. 19 characters must be rejected
        // here even though it would fit under a 6-digit company prefix.
        let mut giai = Giai::create("061414114725", "a".repeat(19).as_str()).unwrap();
        giai.set_scheme(GiaiScheme::Giai202).unwrap();
        assert!(matches!(giai.get_binary(), Err(EpcError::InvalidSerial(_))));
    }

    #[test]
    fn asset_reference_at_its_partition_rows_limit_round_trips() {
        let mut giai = Giai::create("061414114725", "a".repeat(18).as_str()).unwrap();
        giai.set_scheme(GiaiScheme::Giai202).unwrap();
        let hex = giai.get_binary().unwrap();
        assert_eq!(Giai::create_from_binary(&hex).unwrap(), giai);
    }

    #[test]
    fn decode_uses_the_partition_table_matching_its_own_scheme() {
        let mut giai = Giai::create("061414", "1234567890123456789").unwrap();
        giai.set_scheme(GiaiScheme::Giai96).unwrap();
        let hex = giai.get_binary().unwrap();
        let decoded = Giai::create_from_binary(&hex).unwrap();
        assert_eq!(decoded.company_prefix(), "061414");
    }
}
