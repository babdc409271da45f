//! Free-text address parsing.
//!
//! Users type addresses most-significant first, separated by spaces
//! (`"서울 강남구 역삼동"`). Parsing is total: any string, including the
//! empty string, yields a [`ParsedAddress`] whose first level is non-empty.

use moodmap_types::ParsedAddress;

/// Placeholder first level for an address with no tokens.
///
/// It never resolves to a region, so such observations are dropped during
/// clustering rather than pinned somewhere arbitrary.
pub const UNKNOWN_REGION: &str = "unknown-region";

/// Split `raw` into up to three administrative levels.
///
/// Runs of whitespace count as a single separator. Tokens past the third
/// are ignored.
pub fn parse(raw: &str) -> ParsedAddress {
    let mut tokens = raw.split_whitespace();
    let level1 = tokens.next().unwrap_or(UNKNOWN_REGION).to_owned();
    let level2 = tokens.next().unwrap_or_default().to_owned();
    let level3 = tokens.next().unwrap_or_default().to_owned();
    ParsedAddress {
        level1,
        level2,
        level3,
        raw: raw.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_levels() {
        let p = parse("서울 강남구 역삼동");
        assert_eq!(p.levels(), ["서울", "강남구", "역삼동"]);
        assert_eq!(p.raw, "서울 강남구 역삼동");
    }

    #[test]
    fn two_levels_leave_third_empty() {
        let p = parse("경기 수원시");
        assert_eq!(p.level1, "경기");
        assert_eq!(p.level2, "수원시");
        assert!(p.level3.is_empty());
    }

    #[test]
    fn empty_and_blank_fall_back_to_placeholder() {
        for raw in ["", "   ", "\t\n"] {
            let p = parse(raw);
            assert_eq!(p.level1, UNKNOWN_REGION);
            assert!(p.level2.is_empty());
            assert!(p.level3.is_empty());
        }
    }

    #[test]
    fn extra_whitespace_is_collapsed() {
        let p = parse("  부산   해운대구\t우동  ");
        assert_eq!(p.levels(), ["부산", "해운대구", "우동"]);
    }

    #[test]
    fn tokens_past_third_are_ignored() {
        let p = parse("서울 종로구 청운동 1-1 101호");
        assert_eq!(p.levels(), ["서울", "종로구", "청운동"]);
    }

    #[test]
    fn first_level_never_empty() {
        for raw in ["a", " b", "c ", "x y z w", "", " "] {
            assert!(!parse(raw).level1.is_empty(), "empty level1 for {raw:?}");
        }
    }
}
