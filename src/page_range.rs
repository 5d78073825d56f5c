use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("invalid page range token: {0:?}")]
    InvalidToken(String),
    #[error("page {page} is out of range (1-{max_page})")]
    PageOutOfBounds { page: u32, max_page: u32 },
}

/// Format a set of page numbers as a range expression like "1-3,5".
///
/// Consecutive pages are merged into `start-end` tokens. The empty set
/// formats as the empty string.
pub fn selection_to_range(pages: &BTreeSet<u32>) -> String {
    let mut tokens = Vec::new();
    let mut iter = pages.iter().copied();

    let Some(first) = iter.next() else {
        return String::new();
    };

    let (mut start, mut end) = (first, first);
    for page in iter {
        if page == end + 1 {
            end = page;
        } else {
            tokens.push(format_run(start, end));
            start = page;
            end = page;
        }
    }
    tokens.push(format_run(start, end));

    tokens.join(",")
}

fn format_run(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}

/// Parse a range expression like "1,3-5" into the set of pages it denotes.
///
/// Tokens are comma-separated, each a bare integer or a `low-high` pair.
/// A reversed pair ("3-1") is swapped rather than rejected. Any page outside
/// `[1, max_page]` is an error. Blank input denotes the empty set.
pub fn range_to_selection(text: &str, max_page: u32) -> Result<BTreeSet<u32>, SelectionError> {
    let mut pages = BTreeSet::new();
    if text.trim().is_empty() {
        return Ok(pages);
    }

    for token in text.split(',') {
        let token = token.trim();
        let (low, high) = parse_token(token)?;
        for page in low..=high {
            if page < 1 || page > max_page {
                return Err(SelectionError::PageOutOfBounds { page, max_page });
            }
            pages.insert(page);
        }
    }

    Ok(pages)
}

fn parse_token(token: &str) -> Result<(u32, u32), SelectionError> {
    let invalid = || SelectionError::InvalidToken(token.to_string());

    match token.split_once('-') {
        Some((low, high)) => {
            // "1-2-3" splits into ("1", "2-3"); the tail must be a bare number.
            let low: u32 = low.trim().parse().map_err(|_| invalid())?;
            let high: u32 = high.trim().parse().map_err(|_| invalid())?;
            if low > high {
                Ok((high, low))
            } else {
                Ok((low, high))
            }
        }
        None => {
            let page: u32 = token.parse().map_err(|_| invalid())?;
            Ok((page, page))
        }
    }
}

/// Canonical page selection for a document with a known page count.
///
/// The selected-set is the single source of truth; the range expression is a
/// derived view. Front-ends mutate through the setters here, so there is no
/// checkbox-vs-text synchronization to guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    max_page: u32,
    pages: BTreeSet<u32>,
}

impl PageSelection {
    pub fn new(max_page: u32) -> Self {
        PageSelection {
            max_page,
            pages: BTreeSet::new(),
        }
    }

    /// Parse an expression against a page count, yielding a selection.
    pub fn parse(text: &str, max_page: u32) -> Result<Self, SelectionError> {
        Ok(PageSelection {
            max_page,
            pages: range_to_selection(text, max_page)?,
        })
    }

    pub fn max_page(&self) -> u32 {
        self.max_page
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    /// Replace the selection from a range expression. On error the previous
    /// selection is retained.
    pub fn set_expression(&mut self, text: &str) -> Result<(), SelectionError> {
        self.pages = range_to_selection(text, self.max_page)?;
        Ok(())
    }

    /// The derived range expression for the current selection.
    pub fn expression(&self) -> String {
        selection_to_range(&self.pages)
    }

    pub fn select(&mut self, page: u32) -> Result<(), SelectionError> {
        if page < 1 || page > self.max_page {
            return Err(SelectionError::PageOutOfBounds {
                page,
                max_page: self.max_page,
            });
        }
        self.pages.insert(page);
        Ok(())
    }

    pub fn deselect(&mut self, page: u32) {
        self.pages.remove(&page);
    }

    pub fn toggle(&mut self, page: u32) -> Result<(), SelectionError> {
        if self.pages.remove(&page) {
            Ok(())
        } else {
            self.select(page)
        }
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Selected pages in ascending order.
    pub fn pages(&self) -> Vec<u32> {
        self.pages.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(pages: &[u32]) -> BTreeSet<u32> {
        pages.iter().copied().collect()
    }

    #[test]
    fn test_empty_selection_formats_empty() {
        assert_eq!(selection_to_range(&set(&[])), "");
    }

    #[test]
    fn test_blank_expression_is_empty_set() {
        assert_eq!(range_to_selection("", 10).unwrap(), set(&[]));
        assert_eq!(range_to_selection("   ", 10).unwrap(), set(&[]));
    }

    #[test]
    fn test_runs_are_merged() {
        assert_eq!(selection_to_range(&set(&[1, 2, 3, 5])), "1-3,5");
    }

    #[test]
    fn test_single_pages() {
        assert_eq!(selection_to_range(&set(&[2, 4, 6])), "2,4,6");
    }

    #[test]
    fn test_single_run() {
        assert_eq!(selection_to_range(&set(&[7])), "7");
        assert_eq!(selection_to_range(&set(&[3, 4, 5])), "3-5");
    }

    #[test]
    fn test_parse_mixed_expression() {
        assert_eq!(range_to_selection("1,3-5", 10).unwrap(), set(&[1, 3, 4, 5]));
    }

    #[test]
    fn test_parse_tolerates_spaces() {
        assert_eq!(
            range_to_selection(" 1 , 3 - 5 ", 10).unwrap(),
            set(&[1, 3, 4, 5])
        );
    }

    #[test]
    fn test_reversed_pair_is_swapped() {
        assert_eq!(range_to_selection("3-1", 5).unwrap(), set(&[1, 2, 3]));
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(range_to_selection("1,1-2,2", 5).unwrap(), set(&[1, 2]));
    }

    #[test]
    fn test_out_of_bounds_page() {
        assert_eq!(
            range_to_selection("1,9", 5),
            Err(SelectionError::PageOutOfBounds { page: 9, max_page: 5 })
        );
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(matches!(
            range_to_selection("0", 5),
            Err(SelectionError::PageOutOfBounds { page: 0, .. })
        ));
        assert!(range_to_selection("0-3", 5).is_err());
    }

    #[test]
    fn test_malformed_tokens() {
        for text in ["a", "1-", "-5", "1-2-3", "1,,2", "1.5", "one-two"] {
            assert!(
                matches!(
                    range_to_selection(text, 10),
                    Err(SelectionError::InvalidToken(_))
                ),
                "expected InvalidToken for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_round_trip_canonicalizes() {
        let pages = range_to_selection("3-1,2,7", 10).unwrap();
        assert_eq!(selection_to_range(&pages), "1-3,7");
    }

    #[test]
    fn test_canonical_expression_survives_round_trip() {
        for text in ["1-3,5", "2,4,6", "1", "1-10"] {
            let pages = range_to_selection(text, 10).unwrap();
            assert_eq!(selection_to_range(&pages), text);
        }
    }

    #[test]
    fn test_selection_setters() {
        let mut sel = PageSelection::new(5);
        sel.select(2).unwrap();
        sel.select(3).unwrap();
        sel.select(5).unwrap();
        assert_eq!(sel.expression(), "2-3,5");

        sel.toggle(3).unwrap();
        assert_eq!(sel.expression(), "2,5");

        sel.deselect(2);
        sel.deselect(2);
        assert_eq!(sel.pages(), vec![5]);

        assert!(sel.select(6).is_err());
        assert!(sel.select(0).is_err());
    }

    #[test]
    fn test_set_expression_keeps_prior_state_on_error() {
        let mut sel = PageSelection::parse("1-3", 5).unwrap();
        assert!(sel.set_expression("1,bogus").is_err());
        assert_eq!(sel.expression(), "1-3");

        sel.set_expression("4-5").unwrap();
        assert_eq!(sel.pages(), vec![4, 5]);
    }

    proptest! {
        #[test]
        fn prop_selection_round_trips(pages in proptest::collection::btree_set(1u32..=40, 0..20)) {
            let text = selection_to_range(&pages);
            let parsed = range_to_selection(&text, 40).unwrap();
            prop_assert_eq!(parsed, pages);
        }
    }
}
