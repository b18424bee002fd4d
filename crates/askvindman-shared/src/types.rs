use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

row_id!(
    /// Primary key of an account row.
    UserId
);
row_id!(
    /// Primary key of a profile row.
    ProfileId
);
row_id!(
    /// Primary key of a question row.
    QuestionId
);
row_id!(
    /// Primary key of an answer row.
    AnswerId
);
row_id!(
    /// Primary key of a tag row.
    TagId
);

/// A signed vote. Only `+1` and `-1` exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub enum LikeValue {
    Like,
    Dislike,
}

impl LikeValue {
    pub fn as_i64(self) -> i64 {
        match self {
            LikeValue::Like => 1,
            LikeValue::Dislike => -1,
        }
    }
}

impl TryFrom<i64> for LikeValue {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LikeValue::Like),
            -1 => Ok(LikeValue::Dislike),
            other => Err(ValidationError::InvalidLikeValue(other)),
        }
    }
}

impl From<LikeValue> for i64 {
    fn from(value: LikeValue) -> Self {
        value.as_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_value_accepts_only_unit_votes() {
        assert_eq!(LikeValue::try_from(1), Ok(LikeValue::Like));
        assert_eq!(LikeValue::try_from(-1), Ok(LikeValue::Dislike));
        assert_eq!(
            LikeValue::try_from(0),
            Err(ValidationError::InvalidLikeValue(0))
        );
        assert!(serde_json::from_str::<LikeValue>("2").is_err());
    }

    #[test]
    fn test_row_id_parse_and_serialize() {
        let id: QuestionId = "42".parse().unwrap();
        assert_eq!(id, QuestionId(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert!("4x".parse::<QuestionId>().is_err());
    }
}
