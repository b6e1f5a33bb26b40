//! Asset collection for backend pages.
//!
//! Controllers and widgets declare JavaScript, stylesheet and RSS assets
//! while a page is built. The [`AssetCollector`] resolves each declaration
//! through the active skin, drops duplicates, tags paths with cache-busting
//! build versions, combines bundles and finally renders the markup.

pub mod attributes;
pub mod build;
pub mod collector;
pub mod combiner;

pub use attributes::{AssetAttributes, AttributeMap};
pub use build::{StaticVersions, VersionSource};
pub use collector::{Asset, AssetCollector, AssetFilter, AssetKind, CollectorOptions};
pub use combiner::{AssetCombiner, HashCombiner};
