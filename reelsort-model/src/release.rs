use serde::{Deserialize, Serialize};

/// The library category a release resolves to.
///
/// Releases that carry no recognisable TV marker anywhere in their tree are
/// treated as movies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum ReleaseKind {
    Movie,
    TvShow,
}

impl std::fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseKind::Movie => write!(f, "Movie"),
            ReleaseKind::TvShow => write!(f, "TV Show"),
        }
    }
}
