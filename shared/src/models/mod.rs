//! Domain models for the Trade Analytics Dashboard

mod criteria;
mod profile;
mod raw;
mod record;
mod summary;

pub use criteria::*;
pub use profile::*;
pub use raw::*;
pub use record::*;
pub use summary::*;
