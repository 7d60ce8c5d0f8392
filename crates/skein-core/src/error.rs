use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ItemNotFound,
    InvalidEnumValue,
    MissingSortField,
    EmptyTag,
    InvalidItemsFile,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::ItemNotFound => "E2001",
            Self::InvalidEnumValue => "E2005",
            Self::MissingSortField => "E2006",
            Self::EmptyTag => "E2007",
            Self::InvalidItemsFile => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ItemNotFound => "Item not found",
            Self::InvalidEnumValue => "Invalid direction/action value",
            Self::MissingSortField => "Item is missing the sort field",
            Self::EmptyTag => "Tag is empty",
            Self::InvalidItemsFile => "Items file is not a JSON array of items",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .skein/config.toml and retry."),
            Self::ItemNotFound => Some("Check the product id and item number."),
            Self::InvalidEnumValue => {
                Some("Use ascending/descending for direction and add/remove for tag actions.")
            }
            Self::MissingSortField => {
                Some("Populate the field on every item, or sort by a field all items carry.")
            }
            Self::EmptyTag => Some("Pass a tag with at least one non-space character."),
            Self::InvalidItemsFile => {
                Some("Each item needs at least `number` and `product {id, name}`.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 6] = [
        ErrorCode::ConfigParseError,
        ErrorCode::ItemNotFound,
        ErrorCode::InvalidEnumValue,
        ErrorCode::MissingSortField,
        ErrorCode::EmptyTag,
        ErrorCode::InvalidItemsFile,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let rendered = code.to_string();
            assert_eq!(rendered.len(), 5);
            assert!(rendered.starts_with('E'));
            assert!(rendered.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn every_code_has_a_hint() {
        assert!(ALL.iter().all(|code| code.hint().is_some()));
    }
}
