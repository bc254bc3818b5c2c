//! Garment sizes selectable when adding a product to the cart.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a size label is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown size: {0:?}")]
pub struct SizeParseError(pub String);

/// A selectable product size.
///
/// Serialized as its upper-case label (`"XS"`, `"S"`, `"M"`, `"L"`, `"XL"`),
/// which is also the value posted by size pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(clippy::upper_case_acronyms)]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
}

impl Size {
    /// Every size, smallest first.
    pub const ALL: [Self; 5] = [Self::XS, Self::S, Self::M, Self::L, Self::XL];

    /// The size label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::XS => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Size {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SizeParseError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("M".parse::<Size>().unwrap(), Size::M);
        assert_eq!("xl".parse::<Size>().unwrap(), Size::XL);
        assert_eq!(" s ".parse::<Size>().unwrap(), Size::S);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "XXL".parse::<Size>().unwrap_err();
        assert_eq!(err.to_string(), "unknown size: \"XXL\"");
    }

    #[test]
    fn test_serde_uses_labels() {
        assert_eq!(serde_json::to_string(&Size::XS).unwrap(), "\"XS\"");
        let size: Size = serde_json::from_str("\"L\"").unwrap();
        assert_eq!(size, Size::L);
    }

    #[test]
    fn test_display_matches_label() {
        for size in Size::ALL {
            assert_eq!(size.to_string(), size.label());
        }
    }
}
