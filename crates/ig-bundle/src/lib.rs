//! Insight bundle and assembler for InsightGen.
//!
//! An [`InsightBundle`] is the single output of one analytical pass: KPI
//! records plus whichever of the weather, anomaly, benchmark and forecast
//! branches were enabled. It is built once by [`assemble`] and never
//! mutated afterwards.
//!
//! # Consistency
//!
//! The assembler performs no computation. It checks that every group key
//! referenced by a non-KPI record exists in the KPI set and fails with
//! [`BundleError::UnknownGroupKey`] otherwise. That failure means the
//! engine was wired incorrectly; user data cannot trigger it.
//!
//! # Determinism
//!
//! The bundle holds no timestamps, run ids, or hash maps. Identical input
//! and configuration give byte-identical JSON and therefore equal
//! [`InsightBundle::digest`] values.
//!
//! # Example
//!
//! ```no_run
//! use ig_bundle::{assemble, BundleParts};
//!
//! # fn parts() -> BundleParts { unimplemented!() }
//! let bundle = assemble(parts()).unwrap();
//! println!("{} KPI records, digest {}", bundle.kpis().len(), bundle.digest());
//! ```

pub mod assemble;
pub mod bundle;
pub mod error;
pub mod summary;

pub use assemble::{assemble, BundleParts};
pub use bundle::{InsightBundle, BUNDLE_SCHEMA_VERSION};
pub use error::{BundleError, Result};
pub use summary::AnomalySummary;
