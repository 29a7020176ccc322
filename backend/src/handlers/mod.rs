//! HTTP handlers for the Trade Analytics dataset server

pub mod companies;
pub mod dataset;
pub mod health;
pub mod matching;
pub mod overview;

pub use companies::*;
pub use dataset::*;
pub use health::*;
pub use matching::*;
pub use overview::*;
