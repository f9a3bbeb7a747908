//! Bracket region scanning.
//!
//! Lyrics mark stage directions and ad-libs with `[ ... ]`. Words inside
//! those spans take no part in rhyme or syllable analysis.

use crate::types::BracketRegion;

/// Sorted, non-overlapping bracket regions of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketRegions {
    regions: Vec<BracketRegion>,
}

impl BracketRegions {
    pub fn as_slice(&self) -> &[BracketRegion] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True if character offset `pos` lies inside a region.
    pub fn contains(&self, pos: usize) -> bool {
        self.overlaps(pos, pos + 1)
    }

    /// True if any part of `[start, end)` lies inside a region.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        let i = self.regions.partition_point(|r| r.end <= start);
        self.regions.get(i).is_some_and(|r| r.overlaps(start, end))
    }
}

/// Find all top-level `[ ... ]` regions in one linear pass.
///
/// Nested brackets deepen the current region instead of opening a new one.
/// A stray `]` outside any region is ignored; an unclosed `[` runs to the
/// end of the document.
pub fn scan_brackets(document: &str) -> BracketRegions {
    let mut regions = Vec::new();
    let mut depth = 0usize;
    let mut open_at = 0usize;
    let mut len = 0usize;

    for (i, c) in document.chars().enumerate() {
        len = i + 1;
        match c {
            '[' => {
                if depth == 0 {
                    open_at = i;
                }
                depth += 1;
            }
            ']' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    regions.push(BracketRegion {
                        start: open_at,
                        end: i + 1,
                    });
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        regions.push(BracketRegion {
            start: open_at,
            end: len,
        });
    }

    BracketRegions { regions }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_brackets() {
        assert!(scan_brackets("plain words here").is_empty());
        assert!(scan_brackets("").is_empty());
    }

    #[test]
    fn test_single_region() {
        let r = scan_brackets("la [yeah] la");
        assert_eq!(r.as_slice(), &[BracketRegion { start: 3, end: 9 }]);
        assert!(r.contains(3));
        assert!(r.contains(8));
        assert!(!r.contains(9));
        assert!(!r.contains(2));
    }

    #[test]
    fn test_multiple_regions() {
        let r = scan_brackets("[Verse 1]\nline\n[Chorus]");
        assert_eq!(r.len(), 2);
        assert_eq!(r.as_slice()[1], BracketRegion { start: 15, end: 23 });
    }

    #[test]
    fn test_nested_brackets_one_region() {
        let r = scan_brackets("a [b [c] d] e");
        assert_eq!(r.as_slice(), &[BracketRegion { start: 2, end: 11 }]);
        assert!(r.contains(9));
    }

    #[test]
    fn test_stray_close_ignored() {
        let r = scan_brackets("oops] then [ok]");
        assert_eq!(r.as_slice(), &[BracketRegion { start: 11, end: 15 }]);
    }

    #[test]
    fn test_unclosed_runs_to_end() {
        let r = scan_brackets("sing [ad lib");
        assert_eq!(r.as_slice(), &[BracketRegion { start: 5, end: 12 }]);
    }

    #[test]
    fn test_partial_overlap() {
        let r = scan_brackets("ab[cd]ef");
        assert!(r.overlaps(0, 3));
        assert!(r.overlaps(5, 8));
        assert!(!r.overlaps(0, 2));
        assert!(!r.overlaps(6, 8));
    }

    #[test]
    fn test_offsets_are_characters() {
        let r = scan_brackets("é [x]");
        assert_eq!(r.as_slice(), &[BracketRegion { start: 2, end: 5 }]);
    }
}
