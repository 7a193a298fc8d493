//! Core domain types for the movie aggregator.
//!
//! Upstream records are deserialized straight from the JSON payloads of the
//! details and cast services. The output `Movie` is what the inbound API
//! serializes; absent fields are rendered as `null`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ErrorEntry;
use crate::format::{format_revenue, release_year};
use crate::genre::{GenreId, GenreTable};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier handed out by the movie-index service
pub type MovieId = u64;

/// Identifier of a cast member, embedded in a movie-detail record
pub type CastMemberId = u64;

// =============================================================================
// Upstream Records
// =============================================================================

/// A movie as returned by the movie-details service.
///
/// Only the fields we render are kept; everything else in the payload
/// (tagline, overview, budget, ...) is ignored by serde. Apart from `id`,
/// any field may be missing or `null` without failing the whole payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMovieDetail {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    /// ISO date, e.g. `1999-05-19`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Smallest currency unit
    #[serde(default)]
    pub revenue: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreId>,
    #[serde(default)]
    pub cast: Vec<CastMemberId>,
}

/// A cast member as returned by the cast-details service.
///
/// The upstream sends numeric ids; we carry them as strings because that is
/// what the inbound API exposes. Gender may arrive as a TMDB gender code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(deserialize_with = "gender_label")]
    pub gender: String,
    pub name: String,
    pub profile_path: String,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn gender_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawGender {
        Code(u8),
        Label(String),
    }

    // TMDB codes: 0 unset, 1 female, 2 male, 3 non-binary
    Ok(match RawGender::deserialize(deserializer)? {
        RawGender::Code(1) => "Female".to_string(),
        RawGender::Code(2) => "Male".to_string(),
        RawGender::Code(3) => "Non-binary".to_string(),
        RawGender::Code(_) => "Not specified".to_string(),
        RawGender::Label(label) => label,
    })
}

// =============================================================================
// Output Types
// =============================================================================

/// The hydrated movie view.
///
/// A degraded movie only carries its `id`; every other field is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub revenue: Option<String>,
    pub poster_path: Option<String>,
    pub genres: Option<Vec<String>>,
    pub cast: Option<Vec<CastMember>>,
}

impl Movie {
    /// Id-only movie emitted when its details batch could not be fetched
    pub fn placeholder(id: MovieId) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            release_year: None,
            revenue: None,
            poster_path: None,
            genres: None,
            cast: None,
        }
    }

    /// Build the output view from an upstream record and its resolved cast.
    ///
    /// Genre ids are mapped through `genres`; ids missing from the table are
    /// dropped. An unparsable release date leaves `release_year` empty.
    pub fn from_detail(
        detail: RawMovieDetail,
        genres: &GenreTable,
        cast: Option<Vec<CastMember>>,
    ) -> Self {
        let year = detail.release_date.as_deref().and_then(release_year);
        if let (Some(date), None) = (&detail.release_date, year) {
            tracing::warn!(id = detail.id, release_date = %date, "Unparsable release date");
        }

        Self {
            id: detail.id.to_string(),
            title: detail.title,
            release_year: year,
            revenue: detail.revenue.map(format_revenue),
            poster_path: detail.poster_path,
            genres: Some(genres.names_for(&detail.genres)),
            cast,
        }
    }

    /// True when every field was resolved
    pub fn is_complete(&self) -> bool {
        self.title.is_some()
            && self.release_year.is_some()
            && self.revenue.is_some()
            && self.poster_path.is_some()
            && self.genres.is_some()
            && self.cast.is_some()
    }
}

/// Result of one aggregation call.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieListing {
    pub movies: Vec<Movie>,
    /// Number of ids the index returned, before pagination
    pub total: usize,
    /// `None` when nothing went wrong
    pub errors: Option<Vec<ErrorEntry>>,
}
