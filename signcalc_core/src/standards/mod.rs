//! Standards data: categorical dimensions, versioned packs and the pack cache
//!
//! ```rust
//! use signcalc_core::standards::{PackId, PackStore, StandardCode};
//!
//! let store = PackStore::builtin();
//! let id = PackId::resolve(StandardCode::Asce7, "7-16").unwrap();
//! let pack = store.load(id).unwrap();
//! assert_eq!(pack.hash.as_str().len(), 64);
//! ```

pub mod categories;
pub mod pack;
pub mod store;

pub use categories::{
    ExposureCategory, ImportanceClass, Jurisdiction, MaterialGrade, SoilClass, StandardCode,
};
pub use pack::{
    AnchorRules, Asce7WindData, ContentHash, En1991WindData, FoundationRules, KzTable,
    MemberRules, PackId, SoilProperties, StandardsPack, TerrainParameters, WindData,
};
pub use store::{PackSource, PackStore};
