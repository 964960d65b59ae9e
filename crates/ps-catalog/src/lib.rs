//! ps-catalog: pump catalog data model, file format and loading.
//!
//! The engine only ever sees the validated in-memory types from [`model`].
//! Vendor data arrives through the [`schema`] file format, which stores each
//! curve as parallel arrays; [`load`] turns it into a [`Catalog`], skipping
//! (and reporting) curves whose data cannot be used.

pub mod error;
pub mod load;
pub mod model;
pub mod schema;

pub use error::{CatalogError, CatalogResult};
pub use load::{
    CatalogLoad, SkippedCurve, from_def, load_json, load_path, load_yaml, parse_json, parse_yaml,
};
pub use model::{Catalog, PerformanceCurve, PerformancePoint, PumpModel, PumpSpecifications};
pub use schema::{CatalogDef, CurveDef, PumpDef};
