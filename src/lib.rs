pub mod anagram;
pub mod candidates;
pub mod duplicates;
pub mod form;
#[cfg(feature = "web")]
pub mod session;
#[cfg(feature = "web")]
pub mod web;

pub use anagram::{alphagram, find_anagrams, is_anagram};
pub use candidates::parse_candidates;
pub use duplicates::{DuplicateCount, count_duplicates, find_duplicates, has_duplicate};
pub use form::{FormController, FormState, FormView, Panel, ResultPanels, Snapshot};
