//! Bit-packing, hex, and URI-escaping primitives shared by every EPC codec.
//!
//! Everything here operates on bit strings (`String`s of `'0'`/`'1'`
//! characters) rather than byte buffers, because several scheme total bit
//! lengths (SGLN-195's 196 bits, GRAI-170's 172 bits) are multiples of 4 but
//! not of 8: a byte-oriented bit reader can't address them without an extra
//! alignment fudge. Hex conversion is therefore done a nibble at a time, not
//! a byte at a time.
use crate::error::{EpcError, Result};
use pad::{Alignment, PadStr};

/// Pack `v` into exactly `bits` big-endian binary characters, zero-padded on
/// the left. Callers are responsible for ensuring `v < 2^bits`; the codec
/// only ever calls this after checking the value fits (see
/// `validateSerialForBinaryCoding`-style checks in each family module).
pub(crate) fn encode_integer(v: u64, bits: u32) -> String {
    format!("{:01$b}", v, bits as usize)
}

/// Unpack a big-endian binary string into an integer.
pub(crate) fn decode_integer(bits: &str) -> u64 {
    u64::from_str_radix(bits, 2).expect("bit string produced by our own cursor is always 0/1")
}

/// Pack `s` (restricted to the EPC serial alphabet, whose code points all
/// fit in 7 bits) as 7-bit big-endian character codes, right-padded with
/// `'0'` bits to exactly `bits` wide.
pub(crate) fn encode_string(s: &str, bits: u32) -> String {
    let mut out = String::with_capacity(bits as usize);
    for c in s.chars() {
        out.push_str(&format!("{:07b}", c as u32));
    }
    rpad(&out, bits as usize, '0')
}

/// Unpack a 7-bit-per-character string, stopping at the first all-zero
/// group (the terminator) or at end of input. A trailing group shorter than
/// 7 bits is discarded.
pub(crate) fn decode_string(bits: &str) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i + 7 <= bits.len() {
        let group = &bits[i..i + 7];
        if group == "0000000" {
            break;
        }
        let code = u8::from_str_radix(group, 2).expect("group is always 0/1 chars");
        out.push(code as char);
        i += 7;
    }
    out
}

/// Convert a bit string to uppercase hex, a nibble at a time.
pub(crate) fn bin_to_hex(bin: &str) -> Result<String> {
    if bin.len() % 4 != 0 {
        return Err(EpcError::InvalidArgument(format!(
            "binary length {} is not a multiple of 4",
            bin.len()
        )));
    }
    let mut out = String::with_capacity(bin.len() / 4);
    for nibble in bin.as_bytes().chunks(4) {
        let nibble = std::str::from_utf8(nibble).expect("ascii binary digits");
        let v = u8::from_str_radix(nibble, 2)
            .map_err(|_| EpcError::InvalidArgument(format!("invalid binary digit in {:?}", nibble)))?;
        out.push(std::char::from_digit(v as u32, 16).unwrap().to_ascii_uppercase());
    }
    Ok(out)
}

/// Convert hex (upper- or lowercase) to a bit string, a nibble at a time.
pub(crate) fn hex_to_bin(hex: &str) -> Result<String> {
    let mut out = String::with_capacity(hex.len() * 4);
    for c in hex.chars() {
        let v = c
            .to_digit(16)
            .ok_or_else(|| EpcError::InvalidArgument(format!("invalid hex character '{}'", c)))?;
        out.push_str(&format!("{:04b}", v));
    }
    Ok(out)
}

// Ordered, closed set of URI escapes. `%` must come first on encode (so its
// own replacement isn't re-escaped by a later rule) and last on decode (so
// e.g. "%2522" doesn't get unescaped to "%" before the rest of the string
// has had its other escapes resolved).
const ESCAPES: [(char, &str); 7] = [
    ('%', "%25"),
    ('"', "%22"),
    ('&', "%26"),
    ('/', "%2F"),
    ('<', "%3C"),
    ('>', "%3E"),
    ('?', "%3F"),
];

/// Percent-encode the closed set of characters in `ESCAPES`. Every other
/// character, including the rest of the EPC serial alphabet, passes through
/// unchanged.
pub(crate) fn uri_encode(s: &str) -> String {
    let mut out = s.to_string();
    for &(ch, esc) in ESCAPES.iter() {
        out = out.replace(ch, esc);
    }
    out
}

/// Inverse of [`uri_encode`]. Unknown `%XX` sequences are left untouched.
pub(crate) fn uri_decode(s: &str) -> String {
    let mut out = s.to_string();
    for &(ch, esc) in ESCAPES.iter().skip(1) {
        out = out.replace(esc, &ch.to_string());
    }
    out.replace(ESCAPES[0].1, &ESCAPES[0].0.to_string())
}

/// Left-pad `s` with `c` to length `n` (by character count). A no-op if `s`
/// is already at least `n` characters.
pub(crate) fn lpad(s: &str, n: usize, c: char) -> String {
    s.pad(n, c, Alignment::Right, false)
}

/// Right-pad `s` with `c` to length `n` (by character count). A no-op if
/// `s` is already at least `n` characters.
pub(crate) fn rpad(s: &str, n: usize, c: char) -> String {
    s.pad(n, c, Alignment::Left, false)
}

/// A cursor over a bit string, for pulling off fixed-width fields in
/// sequence the way each family's binary layout is defined (header, filter,
/// partition, company prefix, secondary field, ...).
pub(crate) struct BitCursor<'a> {
    bits: &'a str,
    pos: usize,
}

impl<'a> BitCursor<'a> {
    pub(crate) fn new(bits: &'a str) -> Self {
        BitCursor { bits, pos: 0 }
    }

    /// Take the next `n` bits. Panics if fewer than `n` bits remain; every
    /// call site first checks the overall bit string is exactly the
    /// scheme's total length, so this can't be reached with bad input.
    pub(crate) fn take(&mut self, n: usize) -> &'a str {
        let end = self.pos + n;
        let chunk = &self.bits[self.pos..end];
        self.pos = end;
        chunk
    }

    /// The remainder of the bit string, consuming the cursor.
    pub(crate) fn rest(self) -> &'a str {
        &self.bits[self.pos..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_round_trip() {
        for bits in 1..=64u32 {
            let max = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
            for v in [0, 1, max] {
                let encoded = encode_integer(v, bits);
                assert_eq!(encoded.len(), bits as usize);
                assert_eq!(decode_integer(&encoded), v);
            }
        }
    }

    #[test]
    fn string_round_trip() {
        for s in ["", "a", "32a/b", "ABCxyz_019"] {
            let bits = 140u32;
            assert!(7 * s.len() as u32 <= bits - 7);
            let encoded = encode_string(s, bits);
            assert_eq!(encoded.len(), bits as usize);
            assert_eq!(decode_string(&encoded), s);
        }
    }

    #[test]
    fn hex_bin_round_trip() {
        let hex = "3074257bf7194e4000001a85";
        let bin = hex_to_bin(hex).unwrap();
        assert_eq!(bin.len(), hex.len() * 4);
        assert_eq!(bin_to_hex(&bin).unwrap(), hex.to_uppercase());
    }

    #[test]
    fn hex_to_bin_rejects_bad_digit() {
        assert!(hex_to_bin("3G").is_err());
    }

    #[test]
    fn bin_to_hex_rejects_non_nibble_length() {
        assert!(bin_to_hex("101").is_err());
    }

    #[test]
    fn uri_round_trip() {
        for s in ["32a/b", "hello\"world", "50%", "a&b<c>d?e"] {
            assert_eq!(uri_decode(&uri_encode(s)), s);
        }
    }

    #[test]
    fn uri_encode_escapes_percent_first() {
        assert_eq!(uri_encode("100%"), "100%25");
        assert_eq!(uri_decode("100%25"), "100%");
    }

    #[test]
    fn padding() {
        assert_eq!(lpad("7", 3, '0'), "007");
        assert_eq!(lpad("777", 3, '0'), "777");
        assert_eq!(rpad("7", 3, '0'), "700");
    }
}
