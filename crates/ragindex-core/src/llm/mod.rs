//! Embedding providers
//!
//! The pipeline talks to embedding services only through the [`Embedder`]
//! trait; [`HttpEmbedder`] is the remote implementation.

mod http_embedder;
mod traits;

pub use http_embedder::HttpEmbedder;
pub use traits::*;
