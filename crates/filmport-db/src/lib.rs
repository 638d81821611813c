//! Content store for imported movies.
//!
//! Uses `rusqlite` (bundled `SQLite`) to persist movies, poster assets,
//! and genre terms. Uniqueness of external IDs, poster names, and genre
//! names is enforced by the schema.

mod connection;
/// Genre term operations.
pub mod genres;
mod migrations;
/// Movie content operations.
pub mod movies;
mod outcome;
/// Poster asset operations.
pub mod posters;

#[allow(clippy::module_name_repetitions)]
pub use connection::open_db;
pub use genres::{
    GENRE_VOCABULARY, GenreTerm, find_genre_term, get_or_create_genre_term, load_genre_terms,
};
pub use movies::{
    NewMovie, StoredMovie, count_movies, find_movie_by_external_id, insert_movie,
    load_movie_genres, load_movies,
};
pub use outcome::InsertOutcome;
pub use posters::{
    NewPoster, StoredPoster, count_posters, find_poster_by_name, insert_poster, load_poster_data,
};
