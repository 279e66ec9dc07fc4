//! Field validation rules for tasks.
//!
//! Validators never panic: every check returns a [`Validation`] which is
//! either `Ok(())` or a [`ValidationError`] carrying a message fit for the
//! user. Closed option sets (status, difficulty, category) are described by
//! static [`OptionTable`]s which are the single source of truth for labels,
//! display order and accepted numeric codes.

use thiserror::Error;

/// Outcome of a single validation check
pub type Validation = std::result::Result<(), ValidationError>;

/// A rejected field value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} cannot exceed {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("invalid {field} option {code}; choose a value between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        code: i64,
        min: u8,
        max: u8,
    },

    #[error("unknown {field} '{value}'; expected one of: {expected}")]
    UnknownLabel {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("{field} has no configured options")]
    NoOptions { field: &'static str },

    #[error("{field} is earlier than the creation time")]
    BeforeCreation { field: &'static str },
}

/// Length and emptiness constraints for a free-text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRule {
    pub max_length: usize,
    pub allow_empty: bool,
}

/// Rules applied to task titles
pub const TITLE_RULE: TextRule = TextRule {
    max_length: 100,
    allow_empty: false,
};

/// Rules applied to task descriptions
pub const DESCRIPTION_RULE: TextRule = TextRule {
    max_length: 500,
    allow_empty: true,
};

/// Validate a title against `rule`.
pub fn validate_title(value: &str, rule: &TextRule) -> Validation {
    validate_text("title", value, rule)
}

/// Validate a description against `rule`.
pub fn validate_description(value: &str, rule: &TextRule) -> Validation {
    validate_text("description", value, rule)
}

fn validate_text(field: &'static str, value: &str, rule: &TextRule) -> Validation {
    let length = value.trim().chars().count();
    if !rule.allow_empty && length == 0 {
        return Err(ValidationError::Empty { field });
    }
    if length > rule.max_length {
        return Err(ValidationError::TooLong {
            field,
            max: rule.max_length,
            actual: length,
        });
    }
    Ok(())
}

/// One row of an option table: a value, its stored label and its menu code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice<T: 'static> {
    pub value: T,
    pub label: &'static str,
    pub code: u8,
}

/// Closed set of options for an enumerated field, in display order
#[derive(Debug, Clone, Copy)]
pub struct OptionTable<T: 'static> {
    pub field: &'static str,
    pub entries: &'static [Choice<T>],
}

impl<T: Copy + PartialEq + 'static> OptionTable<T> {
    pub fn iter(&self) -> impl Iterator<Item = &'static Choice<T>> {
        self.entries.iter()
    }

    /// Smallest and largest configured codes
    pub fn code_range(&self) -> Option<(u8, u8)> {
        let min = self.entries.iter().map(|entry| entry.code).min()?;
        let max = self.entries.iter().map(|entry| entry.code).max()?;
        Some((min, max))
    }

    pub fn by_code(&self, code: i64) -> Option<T> {
        self.entries
            .iter()
            .find(|entry| i64::from(entry.code) == code)
            .map(|entry| entry.value)
    }

    /// Case-insensitive label lookup
    pub fn by_label(&self, label: &str) -> Option<T> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|entry| entry.label.eq_ignore_ascii_case(label))
            .map(|entry| entry.value)
    }

    fn entry(&self, value: T) -> Option<&'static Choice<T>> {
        self.entries.iter().find(|entry| entry.value == value)
    }

    /// Label for `value`. Every enum variant has a row in its table.
    pub fn label_of(&self, value: T) -> &'static str {
        self.entry(value).map(|entry| entry.label).unwrap_or("")
    }

    /// Menu code for `value`. Every enum variant has a row in its table.
    pub fn code_of(&self, value: T) -> u8 {
        self.entry(value).map(|entry| entry.code).unwrap_or(0)
    }

    fn labels(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Check that `code` is one of the codes configured in `table`.
pub fn validate_enum_choice<T: Copy + PartialEq + 'static>(
    code: i64,
    table: &OptionTable<T>,
) -> Validation {
    let Some((min, max)) = table.code_range() else {
        return Err(ValidationError::NoOptions { field: table.field });
    };
    if table.by_code(code).is_none() {
        return Err(ValidationError::OutOfRange {
            field: table.field,
            code,
            min,
            max,
        });
    }
    Ok(())
}

/// Resolve user input that is either a numeric menu code or a label.
pub fn parse_choice<T: Copy + PartialEq + 'static>(
    input: &str,
    table: &OptionTable<T>,
) -> std::result::Result<T, ValidationError> {
    let input = input.trim();
    if let Ok(code) = input.parse::<i64>() {
        validate_enum_choice(code, table)?;
        return table
            .by_code(code)
            .ok_or(ValidationError::NoOptions { field: table.field });
    }

    table
        .by_label(input)
        .ok_or_else(|| ValidationError::UnknownLabel {
            field: table.field,
            value: input.to_string(),
            expected: table.labels(),
        })
}
