//! Transcript assembly
//!
//! Joins per-segment transcripts into one document. Ordering is recovered from
//! the explicit segment indices, never from the order the inputs arrive in.

use crate::{GavelError, Result};

/// Marker inserted between consecutive segment transcripts.
pub const SEGMENT_BOUNDARY: &str = "\n\n";

/// Concatenate segment transcripts in ascending index order.
///
/// The input must cover every index in `[0, N)` exactly once, where N is the
/// number of pairs supplied; a gap or duplicate fails with
/// [`GavelError::MissingSegment`] naming the first absent index.
pub fn assemble(mut parts: Vec<(usize, String)>) -> Result<String> {
    parts.sort_by_key(|(index, _)| *index);

    for (expected, (index, _)) in parts.iter().enumerate() {
        if *index != expected {
            return Err(GavelError::MissingSegment(expected));
        }
    }

    Ok(parts
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(SEGMENT_BOUNDARY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(usize, &str)]) -> Vec<(usize, String)> {
        items.iter().map(|(i, t)| (*i, t.to_string())).collect()
    }

    #[test]
    fn joins_in_index_order_with_boundary() {
        let doc = assemble(pairs(&[(0, "A"), (1, "B"), (2, "C")])).unwrap();
        assert_eq!(doc, format!("A{SEGMENT_BOUNDARY}B{SEGMENT_BOUNDARY}C"));
    }

    #[test]
    fn input_order_does_not_matter() {
        let sorted = assemble(pairs(&[(0, "A"), (1, "B"), (2, "C")])).unwrap();
        let shuffled = assemble(pairs(&[(2, "C"), (0, "A"), (1, "B")])).unwrap();
        let reversed = assemble(pairs(&[(2, "C"), (1, "B"), (0, "A")])).unwrap();
        assert_eq!(sorted, shuffled);
        assert_eq!(sorted, reversed);
    }

    #[test]
    fn gap_fails_with_first_missing_index() {
        let err = assemble(pairs(&[(0, "A"), (2, "C")])).unwrap_err();
        assert!(matches!(err, GavelError::MissingSegment(1)));
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let err = assemble(pairs(&[(0, "A"), (1, "B"), (1, "B again")])).unwrap_err();
        assert!(matches!(err, GavelError::MissingSegment(2)));
    }

    #[test]
    fn single_segment_passes_through() {
        assert_eq!(assemble(pairs(&[(0, "only")])).unwrap(), "only");
    }

    #[test]
    fn empty_input_yields_empty_document() {
        assert_eq!(assemble(Vec::new()).unwrap(), "");
    }
}
