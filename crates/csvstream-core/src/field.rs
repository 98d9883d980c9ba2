//! The tagged result of one tokenizer step.

/// Exactly one of: a field's bytes, the end of a row, or the end of the stream.
///
/// `Data(vec![])` is an empty field and is distinct from `StreamEnd`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Data(Vec<u8>),
    RowEnd,
    StreamEnd,
}

impl Field {
    pub fn is_data(&self) -> bool {
        matches!(self, Field::Data(_))
    }

    pub fn is_stream_end(&self) -> bool {
        matches!(self, Field::StreamEnd)
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Field::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<Vec<u8>> {
        match self {
            Field::Data(d) => Some(d),
            _ => None,
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Data(s.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_is_not_stream_end() {
        let f = Field::Data(Vec::new());
        assert!(f.is_data());
        assert!(!f.is_stream_end());
        assert_eq!(f.as_bytes(), Some(&b""[..]));
        assert_ne!(f, Field::StreamEnd);
    }

    #[test]
    fn signals_carry_no_payload() {
        assert_eq!(Field::RowEnd.as_bytes(), None);
        assert_eq!(Field::StreamEnd.into_data(), None);
        assert_eq!(Field::from("x").into_data(), Some(b"x".to_vec()));
    }
}
