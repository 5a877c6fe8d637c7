use serde::{Deserialize, Serialize};

/// Metadata bundle for a movie or an episode, parsed from a sidecar or
/// fetched from the remote catalog. Every field is optional; the naming
/// pattern language substitutes an empty string for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub year: Option<String>,
    pub edition: Option<String>,
    pub sort_title: Option<String>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub director: Option<String>,
    pub rating: Option<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub plot: Option<String>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub resolution: Option<String>,
    pub video_source: Option<String>,
    pub audio_channels: Option<String>,
}

/// Value a single pattern variable resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    Text(String),
    List(Vec<String>),
}

impl Substitution {
    /// True when substituting this value would emit nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Substitution::Text(text) => text.trim().is_empty(),
            Substitution::List(items) => items.is_empty(),
        }
    }
}

impl MediaMetadata {
    /// Resolve a single-letter pattern variable to its value.
    ///
    /// Unknown variables resolve to the empty string so patterns degrade
    /// gracefully instead of erroring.
    pub fn substitution(&self, var: char) -> Substitution {
        let text = |value: &Option<String>| {
            Substitution::Text(value.clone().unwrap_or_default())
        };
        match var {
            'T' => text(&self.title),
            'O' => text(&self.original_title),
            'Y' => text(&self.year),
            '6' => text(&self.edition),
            'E' => text(&self.sort_title),
            'G' => Substitution::List(self.genres.clone()),
            'U' => Substitution::List(self.countries.clone()),
            'C' => text(&self.director),
            'P' => text(&self.rating),
            'I' => text(&self.imdb_id),
            'H' => text(&self.video_codec),
            'J' => text(&self.audio_codec),
            'R' => text(&self.resolution),
            'S' => text(&self.video_source),
            'A' => text(&self.audio_channels),
            '1' => Substitution::Text(
                self.title
                    .as_deref()
                    .and_then(|t| t.chars().next())
                    .map(String::from)
                    .unwrap_or_default(),
            ),
            _ => Substitution::Text(String::new()),
        }
    }

    /// The set of variables the pattern language recognises.
    pub fn variables() -> &'static [char] {
        &[
            'T', 'O', 'Y', '6', 'E', 'G', 'U', 'C', 'P', 'I', 'H', 'J', 'R',
            'S', 'A', '1',
        ]
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.original_title.is_none()
            && self.year.is_none()
            && self.genres.is_empty()
            && self.countries.is_empty()
    }
}
