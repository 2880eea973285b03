//! Catalog access for mitai.
//!
//! The [`traits::Catalog`] trait is what the controller talks to;
//! [`anilist::AniListClient`] is the only implementation.

pub mod anilist;
pub mod traits;

pub use anilist::{AniListClient, CatalogError};
pub use traits::{
    Catalog, CatalogPage, CoverImage, Media, MediaFormat, MediaSeason, MediaTitle, PageQuery,
    Trailer,
};
