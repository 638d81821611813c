//! API client library for filmport.
//!
//! Provides the OMDb API client and the fetcher that turns a
//! year/term search into complete movie records.

/// OMDb API client.
pub mod omdb;
