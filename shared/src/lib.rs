//! Shared types and analytics core for the Trade Analytics Dashboard
//!
//! This crate contains the pure aggregation and matching layer used by the
//! backend dataset server and the browser dashboard (via WASM). It never
//! touches the network or the filesystem; callers hand it already-parsed rows.

pub mod aggregation;
pub mod error;
pub mod matching;
pub mod models;
pub mod normalize;
pub mod profile;
pub mod repository;
pub mod types;
pub mod validation;

pub use aggregation::*;
pub use error::*;
pub use matching::*;
pub use models::*;
pub use normalize::*;
pub use profile::*;
pub use repository::*;
pub use types::*;
pub use validation::*;
