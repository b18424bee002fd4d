use thiserror::Error;

/// Input rejected at the boundary before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is {len} characters long (max {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("Tag name is {len} characters long (max {max})")]
    TagNameTooLong { len: usize, max: usize },

    #[error("Nickname is {len} characters long (max {max})")]
    NicknameTooLong { len: usize, max: usize },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("Invalid like value: {0} (expected 1 or -1)")]
    InvalidLikeValue(i64),
}

/// Reject `value` if it is empty or longer than `max` characters.
pub fn check_len(
    field: &'static str,
    value: &str,
    max: usize,
    too_long: fn(usize, usize) -> ValidationError,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    let len = value.chars().count();
    if len > max {
        return Err(too_long(len, max));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_TAG_NAME_LEN;

    fn tag_too_long(len: usize, max: usize) -> ValidationError {
        ValidationError::TagNameTooLong { len, max }
    }

    #[test]
    fn test_check_len_counts_chars_not_bytes() {
        let name = "ж".repeat(MAX_TAG_NAME_LEN);
        assert!(check_len("tag", &name, MAX_TAG_NAME_LEN, tag_too_long).is_ok());
    }

    #[test]
    fn test_check_len_rejects_long_and_empty() {
        let name = "a".repeat(MAX_TAG_NAME_LEN + 1);
        assert_eq!(
            check_len("tag", &name, MAX_TAG_NAME_LEN, tag_too_long),
            Err(ValidationError::TagNameTooLong { len: 65, max: 64 })
        );
        assert_eq!(
            check_len("tag", "   ", MAX_TAG_NAME_LEN, tag_too_long),
            Err(ValidationError::Empty("tag"))
        );
    }
}
