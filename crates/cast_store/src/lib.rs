//! # Asset Store Module
//!
//! This module provides storage for the audio assets produced by the
//! blog-cast pipeline. Every synthesized narration is written to a uniquely
//! named file inside a working directory and handed to the presentation layer
//! by name.
//!
//! Assets are intentionally short lived: the store can sweep files older than
//! a retention window and removes its whole directory when dropped.

mod store;

pub use store::local::LocalAssetStore;
pub use store::{AssetStore, FailedRemoval, StoredAsset, SweepResult};
