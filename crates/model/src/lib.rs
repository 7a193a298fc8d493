//! # Model Crate
//!
//! Domain types shared by the movie aggregator: the records the upstream
//! services send us, the `Movie` view we hand back, the genre table and the
//! error entries that travel alongside a best-effort result.
//!
//! ## Main Components
//!
//! - **types**: Upstream records (`RawMovieDetail`, `CastMember`) and output types (`Movie`, `MovieListing`)
//! - **genre**: The injected, read-only genre table (`GenreTable`)
//! - **error**: Error entries reported to callers and the `Partial<T>` result carrier
//! - **format**: Revenue and release-year rendering
//!
//! ## Example Usage
//!
//! ```ignore
//! use model::{GenreTable, Movie, RawMovieDetail};
//!
//! let genres = GenreTable::tmdb();
//! let action = genres.lookup("Action").unwrap();
//! assert_eq!(action.id, 28);
//!
//! let movie = Movie::from_detail(raw_detail, &genres, None);
//! println!("{} ({:?})", movie.id, movie.release_year);
//! ```

// Public modules
pub mod error;
pub mod format;
pub mod genre;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{ErrorCode, ErrorEntry, Partial};
pub use format::{format_revenue, release_year};
pub use genre::{Genre, GenreId, GenreTable};
pub use types::{
    // Type aliases
    CastMemberId,
    MovieId,
    // Core types
    CastMember,
    Movie,
    MovieListing,
    RawMovieDetail,
};
