//! Presentation of raw KNX addresses. Values are formatted as stored; they are
//! not validated.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupAddressStyle {
    #[default]
    ThreeLevel, // Main/Middle/Sub (5/3/8)
    TwoLevel,   // Main/Sub (5/11)
    Free,       // 16-bit identifier
}

/// Lenient parse of the style names used by ETS (`ThreeLevel`, `TwoLevel`, `Free`).
pub fn parse_group_address_style(value: &str) -> GroupAddressStyle {
    let raw = value.trim().to_lowercase();
    if raw.contains("two") || raw.contains('2') {
        return GroupAddressStyle::TwoLevel;
    }
    if raw.contains("free") || raw.contains("16") {
        return GroupAddressStyle::Free;
    }
    GroupAddressStyle::ThreeLevel
}

impl FromStr for GroupAddressStyle {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(parse_group_address_style(value))
    }
}

impl fmt::Display for GroupAddressStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupAddressStyle::ThreeLevel => "ThreeLevel",
            GroupAddressStyle::TwoLevel => "TwoLevel",
            GroupAddressStyle::Free => "Free",
        };
        f.write_str(name)
    }
}

/// Formats a raw group address value. Values above 16 bits are printed verbatim.
pub fn format_group_address(value: u64, style: GroupAddressStyle) -> String {
    if value > u64::from(u16::MAX) {
        return value.to_string();
    }
    match style {
        GroupAddressStyle::ThreeLevel => {
            let main = (value >> 11) & 0x1F;
            let middle = (value >> 8) & 0x07;
            let sub = value & 0xFF;
            format!("{}/{}/{}", main, middle, sub)
        }
        GroupAddressStyle::TwoLevel => {
            let main = (value >> 11) & 0x1F;
            let sub = value & 0x07FF;
            format!("{}/{}", main, sub)
        }
        GroupAddressStyle::Free => value.to_string(),
    }
}

/// `Area.Line.Device` notation of an individual address.
pub fn format_individual_address(area: u64, line: u64, device: u64) -> String {
    format!("{}.{}.{}", area, line, device)
}
