//! Per-family partition tables (GS1 EPC Tag Data Standard, Table 14-2 and
//! its siblings for SSCC/SGLN/GRAI/GIAI).
//!
//! Each family distributes its padded-numeric fields across a company
//! prefix and a secondary field whose bit widths trade off against each
//! other depending on how many digits GS1 assigned to the company prefix:
//! a longer company prefix leaves fewer bits (and digits) for the field
//! next to it. The partition index is what gets encoded on the wire; the
//! digit/bit widths are derived from it (or, when encoding, from the
//! company prefix's digit count).

/// One row of a family's partition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PartitionRow {
    pub(crate) partition: u8,
    pub(crate) company_prefix_bits: u32,
    pub(crate) company_prefix_digits: usize,
    pub(crate) secondary_bits: u32,
    pub(crate) secondary_digits: usize,
}

const fn row(
    partition: u8,
    company_prefix_bits: u32,
    company_prefix_digits: usize,
    secondary_bits: u32,
    secondary_digits: usize,
) -> PartitionRow {
    PartitionRow {
        partition,
        company_prefix_bits,
        company_prefix_digits,
        secondary_bits,
        secondary_digits,
    }
}

/// Look up a row by the digit count of a company prefix being encoded.
/// Falls back to row 0 on miss, which well-formed input never triggers.
pub(crate) fn by_company_prefix_digits(table: &[PartitionRow; 7], digits: usize) -> PartitionRow {
    *table
        .iter()
        .find(|r| r.company_prefix_digits == digits)
        .unwrap_or(&table[0])
}

/// Look up a row by the partition index read off the wire. Falls back to
/// row 0 on miss, which well-formed input never triggers.
pub(crate) fn by_partition(table: &[PartitionRow; 7], partition: u8) -> PartitionRow {
    *table
        .iter()
        .find(|r| r.partition == partition)
        .unwrap_or(&table[0])
}

// GS1 EPC TDS Table 14-2 (SGTIN): company prefix vs. indicator+item reference.
pub(crate) const SGTIN_PARTITIONS: [PartitionRow; 7] = [
    row(0, 40, 12, 4, 1),
    row(1, 37, 11, 7, 2),
    row(2, 34, 10, 10, 3),
    row(3, 30, 9, 14, 4),
    row(4, 27, 8, 17, 5),
    row(5, 24, 7, 20, 6),
    row(6, 20, 6, 24, 7),
];

// GS1 EPC TDS Table 14-5 (SSCC): company prefix vs. serial reference.
pub(crate) const SSCC_PARTITIONS: [PartitionRow; 7] = [
    row(0, 40, 12, 18, 5),
    row(1, 37, 11, 21, 6),
    row(2, 34, 10, 24, 7),
    row(3, 30, 9, 28, 8),
    row(4, 27, 8, 31, 9),
    row(5, 24, 7, 34, 10),
    row(6, 20, 6, 38, 11),
];

// GS1 EPC TDS Table 14-8 (SGLN): company prefix vs. location reference.
pub(crate) const SGLN_PARTITIONS: [PartitionRow; 7] = [
    row(0, 40, 12, 1, 0),
    row(1, 37, 11, 4, 1),
    row(2, 34, 10, 7, 2),
    row(3, 30, 9, 11, 3),
    row(4, 27, 8, 14, 4),
    row(5, 24, 7, 17, 5),
    row(6, 20, 6, 21, 6),
];

// GS1 EPC TDS Table 14-14 (GRAI): company prefix vs. asset type.
pub(crate) const GRAI_PARTITIONS: [PartitionRow; 7] = [
    row(0, 40, 12, 4, 0),
    row(1, 37, 11, 7, 1),
    row(2, 34, 10, 10, 2),
    row(3, 30, 9, 14, 3),
    row(4, 27, 8, 17, 4),
    row(5, 24, 7, 20, 5),
    row(6, 20, 6, 24, 6),
];

// GIAI has no fixed-width numeric secondary field: the whole remainder of
// the payload after the company prefix is the asset reference, so its
// width depends on the scheme (96 vs 202) as well as the partition. Hence
// two complete tables rather than one shared by both schemes.
pub(crate) const GIAI96_PARTITIONS: [PartitionRow; 7] = [
    row(0, 40, 12, 42, 13),
    row(1, 37, 11, 45, 14),
    row(2, 34, 10, 48, 15),
    row(3, 30, 9, 52, 16),
    row(4, 27, 8, 55, 17),
    row(5, 24, 7, 58, 18),
    row(6, 20, 6, 62, 19),
];

pub(crate) const GIAI202_PARTITIONS: [PartitionRow; 7] = [
    row(0, 40, 12, 148, 18),
    row(1, 37, 11, 151, 19),
    row(2, 34, 10, 154, 20),
    row(3, 30, 9, 158, 21),
    row(4, 27, 8, 161, 22),
    row(5, 24, 7, 164, 23),
    row(6, 20, 6, 168, 24),
];
