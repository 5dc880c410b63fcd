use crate::anagram::find_anagrams;
use crate::candidates::parse_candidates;
use crate::duplicates::find_duplicates;
use serde::Serialize;
use std::fmt;

pub const WORD_LABEL: &str = "Word";
pub const WORD_LIST_LABEL: &str = "Word List (comma-separated)";
pub const SUBMIT_LABEL: &str = "Find Anagrams";
pub const MATCHES_HEADING: &str = "Anagrams found:";
pub const NO_MATCHES_MESSAGE: &str = "No anagrams found.";
pub const DUPLICATES_HEADING: &str = "Duplicate words:";
pub const NO_DUPLICATES_MESSAGE: &str = "No duplicate words in the list.";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    #[default]
    Idle,
    Edited,
    Submitted,
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormState::Idle => write!(f, "idle"),
            FormState::Edited => write!(f, "edited"),
            FormState::Submitted => write!(f, "submitted"),
        }
    }
}

/// Results of the most recent submission, with the inputs that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub word: String,
    pub word_list: String,
    pub matches: Vec<String>,
    pub duplicates: Vec<String>,
}

impl Snapshot {
    /// Computes both result panels for one submission.
    pub fn compute(word: &str, word_list: &str) -> Self {
        let candidates = parse_candidates(word_list);
        Self {
            word: word.to_string(),
            word_list: word_list.to_string(),
            matches: owned(find_anagrams(word, &candidates)),
            duplicates: owned(find_duplicates(&candidates)),
        }
    }
}

fn owned(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

/// Holds the text of both inputs and the snapshot shown to the user.
///
/// Edits never touch the snapshot; only [`FormController::submit`] replaces it.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    word: String,
    word_list: String,
    state: FormState,
    snapshot: Option<Snapshot>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn word_list(&self) -> &str {
        &self.word_list
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn set_word(&mut self, text: impl Into<String>) {
        self.word = text.into();
        self.mark_edited();
    }

    pub fn set_word_list(&mut self, text: impl Into<String>) {
        self.word_list = text.into();
        self.mark_edited();
    }

    pub fn submit(&mut self) -> &Snapshot {
        self.state = FormState::Submitted;
        self.snapshot.insert(Snapshot::compute(&self.word, &self.word_list))
    }

    pub fn view(&self) -> FormView<'_> {
        FormView {
            word: &self.word,
            word_list: &self.word_list,
            results: self.snapshot.as_ref().map(|snapshot| ResultPanels {
                matches: Panel::from_values(&snapshot.matches),
                duplicates: Panel::from_values(&snapshot.duplicates),
            }),
        }
    }

    fn mark_edited(&mut self) {
        if self.state == FormState::Idle {
            self.state = FormState::Edited;
        }
    }
}

/// Everything a renderer needs to draw the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView<'a> {
    pub word: &'a str,
    pub word_list: &'a str,
    /// `None` until the first submission.
    pub results: Option<ResultPanels<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanels<'a> {
    pub matches: Panel<'a>,
    pub duplicates: Panel<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel<'a> {
    Empty,
    Items(&'a [String]),
}

impl<'a> Panel<'a> {
    fn from_values(values: &'a [String]) -> Self {
        if values.is_empty() {
            Panel::Empty
        } else {
            Panel::Items(values)
        }
    }

    pub fn items(&self) -> &'a [String] {
        match self {
            Panel::Empty => &[],
            Panel::Items(values) => *values,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Panel::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(word: &str, list: &str) -> FormController {
        let mut form = FormController::new();
        form.set_word(word);
        form.set_word_list(list);
        form.submit();
        form
    }

    #[test]
    fn starts_idle_and_empty() {
        let form = FormController::new();
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.word(), "");
        assert_eq!(form.word_list(), "");
        assert!(form.snapshot().is_none());
        assert!(form.view().results.is_none());
    }

    #[test]
    fn edits_are_independent_per_field() {
        let mut form = FormController::new();
        form.set_word("listen");
        assert_eq!(form.state(), FormState::Edited);
        form.set_word_list("silent, hello");
        assert_eq!(form.word(), "listen");
        assert_eq!(form.word_list(), "silent, hello");
        form.set_word("tinsel");
        assert_eq!(form.word_list(), "silent, hello");
        assert!(form.snapshot().is_none());
    }

    #[test]
    fn submit_computes_both_panels() {
        let form = submitted("listen", "silent, hello, enlist, hello");
        assert_eq!(form.state(), FormState::Submitted);
        let snapshot = form.snapshot().expect("snapshot after submit");
        assert_eq!(snapshot.matches, vec!["silent", "enlist"]);
        assert_eq!(snapshot.duplicates, vec!["hello"]);
    }

    #[test]
    fn edits_after_submit_keep_results() {
        let mut form = submitted("listen", "silent, enlist");
        let before = form.snapshot().cloned();
        form.set_word("listen!");
        form.set_word_list("");
        assert_eq!(form.state(), FormState::Submitted);
        assert_eq!(form.snapshot().cloned(), before);
        assert_eq!(form.word(), "listen!");
    }

    #[test]
    fn resubmit_replaces_results() {
        let mut form = submitted("listen", "silent, enlist, a, a");
        form.set_word("arc");
        form.set_word_list("car, b, b, listen");
        let snapshot = form.submit().clone();
        assert_eq!(snapshot.matches, vec!["car"]);
        assert_eq!(snapshot.duplicates, vec!["b"]);
    }

    #[test]
    fn submit_with_empty_inputs_shows_empty_panels() {
        let mut form = FormController::new();
        form.submit();
        let view = form.view();
        let results = view.results.expect("panels after submit");
        assert!(results.matches.is_empty());
        assert!(results.duplicates.is_empty());
    }

    #[test]
    fn view_exposes_items() {
        let form = submitted("xyz", "hello, world, world");
        let view = form.view();
        let results = view.results.expect("panels after submit");
        assert_eq!(results.matches, Panel::Empty);
        assert_eq!(results.duplicates.items(), ["world".to_string()]);
    }
}
