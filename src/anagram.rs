/// Returns the sorted, lowercased characters of `word`.
///
/// Two words are anagrams exactly when their alphagrams are equal.
pub fn alphagram(word: &str) -> String {
    folded_sorted(word).into_iter().collect()
}

/// Returns true if `first` and `second` use the same characters the same
/// number of times, ignoring case.
pub fn is_anagram(first: &str, second: &str) -> bool {
    let first = fold(first);
    let second = fold(second);
    if first.len() != second.len() {
        return false;
    }
    sorted(first) == sorted(second)
}

/// Returns every candidate that is an anagram of `word`, in input order and
/// with its original casing.
pub fn find_anagrams<'a, S>(word: &str, candidates: &'a [S]) -> Vec<&'a str>
where
    S: AsRef<str>,
{
    if word.is_empty() || candidates.is_empty() {
        return Vec::new();
    }
    let target = folded_sorted(word);
    candidates
        .iter()
        .map(|candidate| candidate.as_ref())
        .filter(|candidate| matches_folded(&target, candidate))
        .collect()
}

fn matches_folded(target: &[char], candidate: &str) -> bool {
    let folded = fold(candidate);
    folded.len() == target.len() && sorted(folded) == target
}

fn fold(word: &str) -> Vec<char> {
    word.chars().flat_map(char::to_lowercase).collect()
}

fn sorted(mut chars: Vec<char>) -> Vec<char> {
    chars.sort_unstable();
    chars
}

fn folded_sorted(word: &str) -> Vec<char> {
    sorted(fold(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_case_anagrams() {
        assert!(is_anagram("listen", "silent"));
    }

    #[test]
    fn different_letters_are_not_anagrams() {
        assert!(!is_anagram("hello", "world"));
    }

    #[test]
    fn comparison_ignores_case() {
        assert!(is_anagram("Listen", "silent"));
        assert!(is_anagram("Triangle", "Integral"));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(!is_anagram("abc", "ab"));
    }

    #[test]
    fn reflexive_and_symmetric() {
        for word in ["", "a", "Dormitory", "dirty room", "123!"] {
            assert!(is_anagram(word, word), "{word:?} should match itself");
        }
        let pairs = [("listen", "Silent"), ("abc", "abd"), ("", "x"), ("a b", "ba ")];
        for (a, b) in pairs {
            assert_eq!(is_anagram(a, b), is_anagram(b, a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn empty_strings_are_anagrams() {
        assert!(is_anagram("", ""));
    }

    #[test]
    fn punctuation_and_whitespace_count() {
        assert!(is_anagram("a-b", "b-a"));
        assert!(!is_anagram("ab", "a b"));
        assert!(is_anagram("a1", "1A"));
    }

    #[test]
    fn alphagram_is_sorted_lowercase() {
        assert_eq!(alphagram("Listen"), "eilnst");
        assert_eq!(alphagram(""), "");
    }

    #[test]
    fn finds_anagrams_in_order() {
        let list = ["silent", "hello", "enlist", "world"];
        assert_eq!(find_anagrams("listen", &list), vec!["silent", "enlist"]);
    }

    #[test]
    fn keeps_candidate_casing() {
        let list = ["Silent", "ENLIST", "hello"];
        assert_eq!(find_anagrams("listen", &list), vec!["Silent", "ENLIST"]);
    }

    #[test]
    fn returns_every_matching_candidate() {
        let list = vec!["car".to_string(), "rac".to_string()];
        assert_eq!(find_anagrams("arc", &list), vec!["car", "rac"]);
    }

    #[test]
    fn repeated_matches_are_kept() {
        let list = ["tac", "act", "tac"];
        assert_eq!(find_anagrams("cat", &list), vec!["tac", "act", "tac"]);
    }

    #[test]
    fn no_matches_yields_empty() {
        assert!(find_anagrams("hello", &["world", "foo", "bar"]).is_empty());
    }

    #[test]
    fn empty_inputs_yield_empty() {
        let empty: [&str; 0] = [];
        assert!(find_anagrams("listen", &empty).is_empty());
        assert!(find_anagrams("", &["", "silent"]).is_empty());
    }
}
