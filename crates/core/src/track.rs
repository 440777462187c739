//! Track attribute domain: the artist-name sum type, attribute bounds, and
//! the validation rules shared by the create and update DTOs.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Maximum length of a track name.
pub const MAX_NAME_LEN: u64 = 255;

/// Maximum length of a genre label.
pub const MAX_GENRE_LEN: u64 = 100;

/// Maximum length of a single artist name.
pub const MAX_ARTIST_LEN: usize = 255;

/// Popularity domain, inclusive.
pub const POPULARITY_MIN: i32 = 0;
pub const POPULARITY_MAX: i32 = 100;

/// Domain of the unit-interval audio features (danceability, energy, valence).
pub const UNIT_MIN: f64 = 0.0;
pub const UNIT_MAX: f64 = 1.0;

/// Artist credit of a track: one name, or an ordered list of names.
///
/// Serialized untagged so the wire shape is exactly what was stored: a JSON
/// string stays a string and an array stays an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtistName {
    Single(String),
    Multiple(Vec<String>),
}

impl ArtistName {
    /// Text the search index matches against: all credited names joined by a
    /// single space, in credit order.
    pub fn search_text(&self) -> String {
        match self {
            ArtistName::Single(name) => name.trim().to_string(),
            ArtistName::Multiple(names) => names
                .iter()
                .map(|n| n.trim())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Number of credited names.
    pub fn credit_count(&self) -> usize {
        match self {
            ArtistName::Single(_) => 1,
            ArtistName::Multiple(names) => names.len(),
        }
    }
}

/// Validate an artist credit.
///
/// A single name must be non-blank and at most [`MAX_ARTIST_LEN`] characters;
/// a list must hold at least one entry and every entry must be non-blank.
pub fn validate_artist_name(artist: &ArtistName) -> Result<(), ValidationError> {
    match artist {
        ArtistName::Single(name) => {
            if name.trim().is_empty() {
                return Err(artist_error("artist_name must not be blank"));
            }
            if name.chars().count() > MAX_ARTIST_LEN {
                return Err(artist_error(
                    "artist_name must be at most 255 characters",
                ));
            }
        }
        ArtistName::Multiple(names) => {
            if names.is_empty() {
                return Err(artist_error("artist_name list must not be empty"));
            }
            if names.iter().any(|n| n.trim().is_empty()) {
                return Err(artist_error(
                    "artist_name list entries must not be blank",
                ));
            }
        }
    }
    Ok(())
}

/// Reject strings that are empty once trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::from("must not be blank")));
    }
    Ok(())
}

fn artist_error(message: &'static str) -> ValidationError {
    ValidationError::new("artist_name").with_message(Cow::from(message))
}
