/// Splits a comma-separated word list into trimmed, non-empty candidates.
///
/// Order and repeats are preserved so both the anagram and duplicate panels
/// see the same list.
pub fn parse_candidates(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_order() {
        assert_eq!(
            parse_candidates("silent, hello ,enlist"),
            vec!["silent", "hello", "enlist"]
        );
    }

    #[test]
    fn drops_empty_pieces() {
        assert_eq!(parse_candidates(" , a,, b ,"), vec!["a", "b"]);
        assert!(parse_candidates("").is_empty());
        assert!(parse_candidates(" ,  , ").is_empty());
    }

    #[test]
    fn keeps_repeats_and_inner_whitespace() {
        assert_eq!(
            parse_candidates("dirty room, a, dirty room"),
            vec!["dirty room", "a", "dirty room"]
        );
    }

    #[test]
    fn never_exceeds_comma_count_plus_one() {
        for raw in ["a,b,c", ",,,", "x", "a, ,b,", ""] {
            let commas = raw.matches(',').count();
            assert!(parse_candidates(raw).len() <= commas + 1, "{raw:?}");
        }
    }
}
