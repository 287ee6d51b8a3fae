//! Term extraction for similarity ranking.

use crate::config::{RankingConfig, StopWordsLanguage};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref ENGLISH: HashSet<&'static str> = ENGLISH_STOP_WORDS.iter().copied().collect();
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Terms dropped before weighting.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    builtin: bool,
    extra: HashSet<String>,
}

impl StopWords {
    pub fn english() -> Self {
        Self {
            builtin: true,
            extra: HashSet::new(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn from_config(cfg: &RankingConfig) -> Self {
        let base = match cfg.stop_words {
            StopWordsLanguage::English => Self::english(),
            StopWordsLanguage::None => Self::none(),
        };
        base.with_extra(&cfg.extra_stop_words)
    }

    pub fn contains(&self, term: &str) -> bool {
        (self.builtin && ENGLISH.contains(term)) || self.extra.contains(term)
    }
}

/// Lowercased terms of two or more word characters, stop words removed.
pub fn tokenize(text: &str, stop_words: &StopWords) -> Vec<String> {
    let normalized: String = text.nfkc().collect::<String>().to_lowercase();
    TOKEN
        .find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|t| !stop_words.contains(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_is_complete() {
        assert_eq!(ENGLISH.len(), 318);
    }

    #[test]
    fn drops_short_tokens_and_stop_words() {
        let terms = tokenize("I am a Senior Rust developer, 5 yrs of C.", &StopWords::english());
        assert_eq!(terms, vec!["senior", "rust", "developer", "yrs"]);
    }

    #[test]
    fn none_keeps_common_words() {
        let terms = tokenize("the python", &StopWords::none());
        assert_eq!(terms, vec!["the", "python"]);
    }

    #[test]
    fn extras_are_case_insensitive() {
        let sw = StopWords::english().with_extra(["Resume"]);
        assert_eq!(tokenize("RESUME python", &sw), vec!["python"]);
    }

    #[test]
    fn compatibility_forms_are_folded() {
        // fullwidth letters and the "fi" ligature
        let terms = tokenize("ＲＵＳＴ ﬁle", &StopWords::none());
        assert_eq!(terms, vec!["rust", "file"]);
    }
}
