//! Error types for bin table construction.

use thiserror::Error;

/// Errors raised while building a scorecard bin table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScorecardError {
    /// Parallel fields of the bin table have inconsistent lengths.
    ///
    /// Every field is listed with its length so the message names each of
    /// the mismatched lengths.
    #[error("Inconsistent bin table field lengths: {}", format_field_lengths(.fields))]
    DataShape {
        /// (field name, length) for every parallel field, in definition order
        fields: Vec<(String, usize)>,
    },

    /// A required column is absent from a loaded bin table file.
    #[error("Bin table is missing required column '{column}'. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
}

fn format_field_lengths(fields: &[(String, usize)]) -> String {
    fields
        .iter()
        .map(|(name, len)| format!("{}={}", name, len))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_shape_message_lists_every_field() {
        let err = ScorecardError::DataShape {
            fields: vec![("midpoints".to_string(), 14), ("populations".to_string(), 13)],
        };
        let msg = err.to_string();
        assert!(msg.contains("midpoints=14"), "got: {}", msg);
        assert!(msg.contains("populations=13"), "got: {}", msg);
    }
}
