//! Home module — launcher landing trees + action catalog over a
//! schemaless document store.
//!
//! # Resources
//!
//! - **LandingNode** — one node of the landing hierarchy, persisted flat
//!   and assembled into trees on read
//! - **Action** — a launchable application tile with sharing, authority,
//!   and version-compatibility rules
//! - **Settings** — the single config document: default app, sharing
//!   records, feature toggles
//!
//! # Usage
//!
//! ```ignore
//! use launchpad_home::service::{FixedIdentity, FixedPlatform, HomeService};
//!
//! let service = HomeService::new(store, identity, platform, blobs);
//! let trees = service.list_visible_trees()?;
//! ```

pub mod model;
pub mod service;

pub use model::{Action, LandingNode, PersistedAction, PersistedLandingNode, User};
pub use service::{HomeError, HomeService, IdentityProvider, PlatformProvider};
