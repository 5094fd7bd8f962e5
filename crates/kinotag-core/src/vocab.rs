//! The fixed controlled vocabulary of canonical tags.
//!
//! A [`TagVocabulary`] is an ordered list of canonical tag strings; each tag
//! owns one bit position in every [`TagBitmask`] encoded against it. The
//! vocabulary is static configuration injected at startup, never learned at
//! runtime: changing its size or ordering invalidates every previously
//! persisted mask, so deployments treat it as an immutable schema artifact.
//!
//! Encoding is a pure set projection. Tags outside the vocabulary are
//! expected noise from the classification oracle and are dropped silently;
//! quality enforcement happens upstream in the enrichment validator, not
//! here.

use std::collections::HashMap;

use crate::bitmask::TagBitmask;
use crate::{Error, Result};

/// The curated movie-descriptor dictionary, 50 entries.
///
/// Chosen to cover the space of movies with minimal semantic overlap between
/// entries. The ordering is load-bearing: it defines bit positions for every
/// mask ever persisted against this vocabulary.
const MOVIE_DESCRIPTORS: [&str; 50] = [
    "lighthearted",
    "melancholic",
    "bittersweet",
    "bleak",
    "uplifting",
    "tense",
    "satirical",
    "heartwarming",
    "darkly-comic",
    "existentialist",
    "thought-provoking",
    "mind-bending",
    "nostalgic",
    "subversive",
    "redemption",
    "forbidden-love",
    "power-corruption",
    "identity-crisis",
    "survivalist",
    "slow-burn",
    "breakneck",
    "visually-immersive",
    "stylized-choreography",
    "dreamlike",
    "dialogue-heavy",
    "action-packed",
    "star-vehicle",
    "character-study",
    "cult-favorite",
    "family-oriented",
    "lore-rich",
    "silence-utilizing",
    "provocative",
    "political",
    "whimsical",
    "gritty",
    "tragic",
    "suspenseful",
    "comedic",
    "intimate",
    "psychedelic",
    "dystopian",
    "post-apocalyptic",
    "sentimental",
    "multi-layered",
    "morally-ambiguous",
    "sprawling",
    "atmospheric",
    "raw",
    "exuberant",
];

/// An ordered, duplicate-free list of canonical tags with stable positions.
#[derive(Debug, Clone)]
pub struct TagVocabulary {
    tags: Vec<String>,
    index: HashMap<String, usize>,
}

impl TagVocabulary {
    /// Build a vocabulary from an ordered tag list.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Vocabulary`] on an empty list, an empty tag, or a
    /// duplicate tag.
    pub fn new<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        if tags.is_empty() {
            return Err(Error::vocabulary("vocabulary must not be empty"));
        }

        let mut index = HashMap::with_capacity(tags.len());
        for (position, tag) in tags.iter().enumerate() {
            if tag.trim().is_empty() {
                return Err(Error::vocabulary(format!(
                    "empty tag at position {position}"
                )));
            }
            if index.insert(tag.clone(), position).is_some() {
                return Err(Error::vocabulary(format!("duplicate tag: {tag}")));
            }
        }

        Ok(Self { tags, index })
    }

    /// The built-in 50-descriptor movie vocabulary.
    pub fn movie_descriptors() -> Self {
        let tags: Vec<String> = MOVIE_DESCRIPTORS.iter().map(|t| (*t).to_string()).collect();
        let index = tags
            .iter()
            .enumerate()
            .map(|(position, tag)| (tag.clone(), position))
            .collect();
        Self { tags, index }
    }

    /// Number of tags (the width of every mask encoded against this
    /// vocabulary).
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the vocabulary is empty. Never true for a constructed value.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Bit position of `tag`, or `None` when it is not a member.
    pub fn position_of(&self, tag: &str) -> Option<usize> {
        self.index.get(tag).copied()
    }

    /// The tag at `position`, or `None` when out of range.
    pub fn tag_at(&self, position: usize) -> Option<&str> {
        self.tags.get(position).map(String::as_str)
    }

    /// Whether `tag` is a vocabulary member.
    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// The ordered tag list.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Encode a tag collection into a fixed-width bitmask.
    ///
    /// Unknown tags are dropped silently, duplicates collapse onto the same
    /// bit, and input order is irrelevant: the mask encodes a set, not a
    /// sequence. An empty input yields the all-zero mask.
    pub fn encode<I, S>(&self, tags: I) -> TagBitmask
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mask = TagBitmask::zero(self.len());
        for tag in tags {
            if let Some(position) = self.position_of(tag.as_ref()) {
                mask.set(position);
            }
        }
        mask
    }

    /// Decode a mask back into the tags whose bits are set.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DimensionMismatch`] when the mask was not encoded
    /// against a vocabulary of this size.
    pub fn decode<'a>(&'a self, mask: &TagBitmask) -> Result<Vec<&'a str>> {
        if mask.width() != self.len() {
            return Err(Error::DimensionMismatch {
                expected: self.len(),
                actual: mask.width(),
            });
        }
        Ok(self
            .tags
            .iter()
            .enumerate()
            .filter(|(position, _)| mask.get(*position) == Some(true))
            .map(|(_, tag)| tag.as_str())
            .collect())
    }
}
