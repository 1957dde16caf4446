//! Memory Words
//!
//! Letter-pair dictionary and the flashcard deck built from it.
//!
//! - `PairKey`: two label characters, e.g. `ㄅㄆ`
//! - `MemoryWordDict`: pair key -> mnemonic word
//! - `initialize_cards` / `sync_cards`: one card per pair with a real word

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::encoding::PRIMARY_ALPHABET;
use crate::fsrs::FSRSCard;

/// Placeholder word for pairs without a mnemonic
pub const UNDEFINED_WORD: &str = "未定";

// ============================================================================
// ERROR TYPES
// ============================================================================

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("Invalid pair key '{0}': expected exactly two characters")]
    InvalidPairKey(String),
}

// ============================================================================
// PAIR KEY
// ============================================================================

/// Two single-character codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    first: char,
    second: char,
}

impl PairKey {
    pub fn new(first: char, second: char) -> Self {
        Self { first, second }
    }

    pub fn code1(&self) -> String {
        self.first.to_string()
    }

    pub fn code2(&self) -> String {
        self.second.to_string()
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}

impl FromStr for PairKey {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => Ok(Self::new(first, second)),
            _ => Err(WordError::InvalidPairKey(s.to_string())),
        }
    }
}

impl Serialize for PairKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PairKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// DICTIONARY
// ============================================================================

fn is_placeholder(word: &str) -> bool {
    let word = word.trim();
    word.is_empty() || word == UNDEFINED_WORD
}

/// Letter pair -> mnemonic word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryWordDict {
    words: BTreeMap<PairKey, String>,
}

impl Default for MemoryWordDict {
    /// Every ordered pair over the primary alphabet, all undefined
    fn default() -> Self {
        let mut words = BTreeMap::new();
        for first in PRIMARY_ALPHABET {
            for second in PRIMARY_ALPHABET {
                let key = format!("{}{}", first, second);
                if let Ok(key) = key.parse() {
                    words.insert(key, UNDEFINED_WORD.to_string());
                }
            }
        }
        Self { words }
    }
}

impl MemoryWordDict {
    pub fn empty() -> Self {
        Self {
            words: BTreeMap::new(),
        }
    }

    /// Import a flat `pair -> word` map.
    ///
    /// Malformed keys and placeholder words are skipped.
    pub fn from_flat_map(raw: HashMap<String, String>) -> Self {
        let mut dict = Self::empty();
        for (key, word) in raw {
            match key.parse::<PairKey>() {
                Ok(pair) if !is_placeholder(&word) => {
                    dict.words.insert(pair, word.trim().to_string());
                }
                Ok(_) => {}
                Err(e) => warn!(key = %key, "Skipping word entry: {}", e),
            }
        }
        dict
    }

    /// Import a spreadsheet grid (CSV or TSV).
    ///
    /// The header row lists first codes; each following row starts with a
    /// second code, then one word per header column.
    pub fn from_grid(text: &str) -> Self {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let Some(header) = lines.next() else {
            return Self::empty();
        };
        let delimiter = if header.contains('\t') { '\t' } else { ',' };
        let split = |line: &str| -> Vec<String> {
            line.split(delimiter)
                .map(|cell| cell.trim().trim_matches('"').to_string())
                .collect()
        };

        let first_codes: Vec<String> = split(header).into_iter().skip(1).collect();
        let mut raw = HashMap::new();
        for line in lines {
            let cells = split(line);
            let Some((second, row)) = cells.split_first() else {
                continue;
            };
            if second.is_empty() {
                continue;
            }
            for (first, word) in first_codes.iter().zip(row) {
                if !first.is_empty() {
                    raw.insert(format!("{}{}", first, second), word.clone());
                }
            }
        }
        let dict = Self::from_flat_map(raw);
        debug!(words = dict.defined_count(), "Parsed word grid");
        dict
    }

    pub fn get(&self, key: &PairKey) -> Option<&str> {
        self.words.get(key).map(String::as_str)
    }

    /// Set a word; blank input resets the pair to the placeholder
    pub fn set(&mut self, key: PairKey, word: &str) {
        let word = word.trim();
        let word = if word.is_empty() { UNDEFINED_WORD } else { word };
        self.words.insert(key, word.to_string());
    }

    /// Overlay another dictionary's defined words
    pub fn merge(&mut self, other: &MemoryWordDict) {
        for (key, word) in other.defined() {
            self.words.insert(key, word.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PairKey, &str)> {
        self.words.iter().map(|(k, w)| (*k, w.as_str()))
    }

    /// Entries with a real word
    pub fn defined(&self) -> impl Iterator<Item = (PairKey, &str)> {
        self.iter().filter(|(_, word)| !is_placeholder(word))
    }

    pub fn defined_count(&self) -> usize {
        self.defined().count()
    }
}

// ============================================================================
// CARDS
// ============================================================================

/// One new card per defined word
pub fn initialize_cards(dict: &MemoryWordDict, now: DateTime<Utc>) -> Vec<FSRSCard> {
    dict.defined()
        .map(|(key, word)| FSRSCard::new(&key.code1(), &key.code2(), word, now))
        .collect()
}

/// Rebuild the deck after dictionary edits.
///
/// Cards whose word is unchanged keep their scheduling state. A changed word
/// starts the pair over as a new card under the same id; pairs that lost
/// their word are dropped and newly defined pairs get new cards.
pub fn sync_cards(
    existing: &[FSRSCard],
    dict: &MemoryWordDict,
    now: DateTime<Utc>,
) -> Vec<FSRSCard> {
    let by_id: HashMap<&str, &FSRSCard> = existing.iter().map(|c| (c.id.as_str(), c)).collect();
    let cards: Vec<FSRSCard> = dict
        .defined()
        .map(|(key, word)| match by_id.get(key.to_string().as_str()) {
            Some(card) if card.word == word => (*card).clone(),
            _ => FSRSCard::new(&key.code1(), &key.code2(), word, now),
        })
        .collect();
    debug!(
        before = existing.len(),
        after = cards.len(),
        "Synchronized cards with dictionary"
    );
    cards
}

// ============================================================================
// TESTS
// ============================================================================
