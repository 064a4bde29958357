//! The fixed set of columns every asset export must carry.

use std::fmt;

/// One of the eleven required asset columns.
///
/// Declaration order is the canonical column order used for report headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Account,
    ServiceAddress,
    AssetId,
    RegisterId,
    Size,
    ReadType,
    Multiplier,
    NumberOfDials,
    AmrCode,
    MxuNumber,
    MxuType,
}

/// Number of required columns.
pub const FIELD_COUNT: usize = 11;

impl Field {
    /// All required fields in canonical order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Account,
        Field::ServiceAddress,
        Field::AssetId,
        Field::RegisterId,
        Field::Size,
        Field::ReadType,
        Field::Multiplier,
        Field::NumberOfDials,
        Field::AmrCode,
        Field::MxuNumber,
        Field::MxuType,
    ];

    /// Exact header text expected in the source file.
    pub fn header(self) -> &'static str {
        match self {
            Field::Account => "Account",
            Field::ServiceAddress => "Service Address",
            Field::AssetId => "Asset ID",
            Field::RegisterId => "Register ID",
            Field::Size => "Size",
            Field::ReadType => "Read Type",
            Field::Multiplier => "Multiplier",
            Field::NumberOfDials => "Number of Dials",
            Field::AmrCode => "AMR Code",
            Field::MxuNumber => "MXU Number",
            Field::MxuType => "MXU Type",
        }
    }

    /// Position of this field within [`Field::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a field by its exact header text.
    pub fn from_header(header: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.header() == header)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}
