pub mod denylist;
pub mod etl;
pub mod extractor;
pub mod normalizer;
pub mod popularity;

pub use crate::domain::model::{
    CharacterSet, ComparisonRow, CreditedRole, FilmCast, FilmEntry, FilmRef, NormalizedName,
    Report,
};
pub use crate::domain::ports::{CastStore, ConfigProvider, FilmCatalog, Pipeline, Storage};
pub use crate::utils::error::Result;
