//! Axis value flags.

use std::{fmt, str::FromStr};

/// A single STAT axis value flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisValueFlag {
    OlderSiblingFontAttribute,
    ElidableAxisValueName,
}

impl AxisValueFlag {
    pub const ALL: [Self; 2] = [Self::OlderSiblingFontAttribute, Self::ElidableAxisValueName];

    /// Bit value as stored in the STAT table.
    pub const fn bits(self) -> u16 {
        match self {
            Self::OlderSiblingFontAttribute => 0x0001,
            Self::ElidableAxisValueName => 0x0002,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::OlderSiblingFontAttribute => "OlderSiblingFontAttribute",
            Self::ElidableAxisValueName => "ElidableAxisValueName",
        }
    }
}

impl FromStr for AxisValueFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|flag| flag.name() == s).ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for AxisValueFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The flags set on one axis value, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    flags: Vec<AxisValueFlag>,
}

impl Flags {
    pub fn new(flags: impl IntoIterator<Item = AxisValueFlag>) -> Self {
        Self {
            flags: flags.into_iter().collect(),
        }
    }

    /// All flags ORed together; `0` when empty.
    pub fn bits(&self) -> u16 {
        self.flags.iter().fold(0, |acc, flag| acc | flag.bits())
    }

    pub fn contains(&self, flag: AxisValueFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AxisValueFlag> + '_ {
        self.flags.iter().copied()
    }
}

impl FromIterator<AxisValueFlag> for Flags {
    fn from_iter<I: IntoIterator<Item = AxisValueFlag>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero() {
        assert_eq!(Flags::default().bits(), 0);
    }

    #[test]
    fn bits_are_ored() {
        let flags = Flags::new(AxisValueFlag::ALL);
        assert_eq!(flags.bits(), 0x0003);
        assert_eq!(Flags::new([AxisValueFlag::ElidableAxisValueName]).bits(), 0x0002);
        // repeated flags do not change the value
        let twice = Flags::new([
            AxisValueFlag::OlderSiblingFontAttribute,
            AxisValueFlag::OlderSiblingFontAttribute,
        ]);
        assert_eq!(twice.bits(), 0x0001);
    }

    #[test]
    fn parse_names() {
        assert_eq!(
            "ElidableAxisValueName".parse::<AxisValueFlag>(),
            Ok(AxisValueFlag::ElidableAxisValueName)
        );
        assert!("Elidable".parse::<AxisValueFlag>().is_err());
    }
}
