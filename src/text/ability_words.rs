use crate::foundation::error::{TypesetError, TypesetResult};

/// Default ability-word vocabulary.
///
/// Keyword abilities that happen to be followed by an em-dash on some cards
/// (for example "Boast") are not ability words and print upright.
const BUILTIN: &[&str] = &[
    "Adamant",
    "Addendum",
    "Alliance",
    "Battalion",
    "Bloodrush",
    "Celebration",
    "Channel",
    "Chroma",
    "Cohort",
    "Constellation",
    "Converge",
    "Corrupted",
    "Council's dilemma",
    "Coven",
    "Delirium",
    "Descend 4",
    "Descend 8",
    "Domain",
    "Eerie",
    "Eminence",
    "Enrage",
    "Fateful hour",
    "Fathomless descent",
    "Ferocious",
    "Flurry",
    "Formidable",
    "Fuse",
    "Grandeur",
    "Hellbent",
    "Heroic",
    "Imprint",
    "Inspired",
    "Join forces",
    "Kinship",
    "Landfall",
    "Lieutenant",
    "Magecraft",
    "Metalcraft",
    "Morbid",
    "Pack tactics",
    "Paradox",
    "Parley",
    "Radiance",
    "Raid",
    "Rally",
    "Revolt",
    "Secret council",
    "Spell mastery",
    "Strive",
    "Survival",
    "Sweep",
    "Tempting offer",
    "Threshold",
    "Undergrowth",
    "Valiant",
    "Void",
    "Will of the council",
];

/// Immutable set of italic-triggering ability words.
///
/// Built once (from [`AbilityWordTable::builtin`], a word list, or JSON) and
/// shared read-only, typically behind an `Arc`. Entries are matched as exact,
/// case-sensitive phrases; when several entries prefix a line the longest wins.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AbilityWordTable {
    // Sorted by descending byte length, then lexically.
    words: Vec<String>,
}

impl AbilityWordTable {
    /// Table holding the default vocabulary.
    pub fn builtin() -> Self {
        Self::normalize(BUILTIN.iter().map(|w| (*w).to_string()).collect())
    }

    /// Build a table from arbitrary entries. Empty or whitespace-padded
    /// entries are rejected.
    pub fn from_words<I, S>(words: I) -> TypesetResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words.into_iter().map(Into::into).collect::<Vec<String>>();
        for w in &words {
            if w.is_empty() {
                return Err(TypesetError::invalid("ability word must be non-empty"));
            }
            if w.trim() != w {
                return Err(TypesetError::invalid(format!(
                    "ability word '{w}' must not have leading or trailing whitespace"
                )));
            }
            if w.contains('\n') {
                return Err(TypesetError::invalid(format!(
                    "ability word '{w}' must not contain a line break"
                )));
            }
        }
        Ok(Self::normalize(words))
    }

    /// Parse a JSON array of strings.
    pub fn from_json_str(s: &str) -> TypesetResult<Self> {
        serde_json::from_str(s).map_err(|e| TypesetError::serde(e.to_string()))
    }

    /// Table with no entries.
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    fn normalize(mut words: Vec<String>) -> Self {
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.dedup();
        Self { words }
    }

    /// Whether `word` is an exact entry.
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate entries, longest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Longest entry that `line` starts with, if any.
    pub fn longest_prefix_of<'a>(&'a self, line: &str) -> Option<&'a str> {
        self.words
            .iter()
            .map(String::as_str)
            .find(|w| line.starts_with(w))
    }
}

impl Default for AbilityWordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<String>> for AbilityWordTable {
    type Error = TypesetError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_words(value)
    }
}

impl From<AbilityWordTable> for Vec<String> {
    fn from(value: AbilityWordTable) -> Self {
        value.words
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/ability_words.rs"]
mod tests;
