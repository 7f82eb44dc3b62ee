pub mod actions;
pub mod catalog;
pub mod forest;
pub mod nodes;
pub mod pruning;
pub mod settings;
pub mod translations;
pub mod tree;

use std::sync::Arc;

use thiserror::Error;

use launchpad_store::{BlobUploader, ObjectStore, StoreError};

use crate::model::User;

/// Datastore namespaces, one whole JSON document each.
pub mod namespaces {
    pub const ACTIONS: &str = "actions";
    pub const LANDING_PAGES: &str = "landing-pages";
    pub const CONFIG: &str = "config";
}

/// Home service error type.
#[derive(Debug, Error)]
pub enum HomeError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("unsupported action schema revision: {0}")]
    SchemaVersion(i64),

    #[error("cyclic tree at node: {0}")]
    CyclicTree(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<StoreError> for HomeError {
    fn from(e: StoreError) -> Self {
        match e {
            // A document that fails to decode is a shape problem, not a
            // backend problem.
            StoreError::Serialization(m) => HomeError::Validation(m),
            StoreError::Storage(m) => HomeError::Storage(m),
        }
    }
}

impl From<HomeError> for launchpad_core::ServiceError {
    fn from(e: HomeError) -> Self {
        match e {
            HomeError::NotFound(m) => launchpad_core::ServiceError::NotFound(m),
            HomeError::Validation(m) => launchpad_core::ServiceError::Validation(m),
            HomeError::SchemaVersion(v) => {
                launchpad_core::ServiceError::SchemaVersion(v.to_string())
            }
            HomeError::CyclicTree(m) => launchpad_core::ServiceError::CyclicTree(m),
            HomeError::Storage(m) => launchpad_core::ServiceError::Storage(m),
            HomeError::Internal(m) => launchpad_core::ServiceError::Internal(m),
        }
    }
}

/// Identity collaborator: who is asking, with their groups and role
/// authorities.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Result<User, HomeError>;
}

/// Host platform collaborator: version string and app install probe.
pub trait PlatformProvider: Send + Sync {
    fn version(&self) -> Result<String, HomeError>;

    /// Whether an app is reachable at a launch URL. Absolute URLs are never
    /// considered installed.
    fn is_app_installed(&self, launch_url: &str) -> bool;
}

/// A fixed identity. Used for testing and for embedding the engine where
/// the viewer is known up front.
pub struct FixedIdentity(pub User);

impl IdentityProvider for FixedIdentity {
    fn current_user(&self) -> Result<User, HomeError> {
        Ok(self.0.clone())
    }
}

/// A fixed platform version that reports every relative URL as installed.
/// Used for testing.
pub struct FixedPlatform(pub String);

impl PlatformProvider for FixedPlatform {
    fn version(&self) -> Result<String, HomeError> {
        Ok(self.0.clone())
    }

    fn is_app_installed(&self, launch_url: &str) -> bool {
        launch_url.starts_with('/')
    }
}

/// The home service. Holds the object store and the external collaborators.
///
/// Every operation is a whole-document read-modify-write against one
/// namespace: load, transform in memory, write back. Two concurrent writers
/// can clobber each other — last write wins, by design of the surrounding
/// datastore API.
pub struct HomeService {
    pub(crate) store: Arc<dyn ObjectStore>,
    pub(crate) identity: Arc<dyn IdentityProvider>,
    pub(crate) platform: Arc<dyn PlatformProvider>,
    pub(crate) blobs: Arc<dyn BlobUploader>,
}

impl HomeService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        identity: Arc<dyn IdentityProvider>,
        platform: Arc<dyn PlatformProvider>,
        blobs: Arc<dyn BlobUploader>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            identity,
            platform,
            blobs,
        })
    }

    /// Upload a file through the blob collaborator, returning its URL.
    pub fn upload_file(&self, filename: &str, data: &[u8]) -> Result<String, HomeError> {
        Ok(self.blobs.upload(filename, data)?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use launchpad_core::NamedRef;
    use launchpad_store::{MemoryBlobUploader, MemoryStore};

    use super::{FixedIdentity, FixedPlatform, HomeService};
    use crate::model::{User, UserRole};

    pub fn test_user() -> User {
        User {
            id: "u1".into(),
            name: "Alice".into(),
            username: "alice".into(),
            user_roles: vec![UserRole {
                id: "r1".into(),
                name: "viewer".into(),
                authorities: vec!["F_VIEW".into()],
            }],
            user_groups: vec![NamedRef::new("g1", "Group 1")],
        }
    }

    pub fn test_service() -> Arc<HomeService> {
        test_service_for(test_user())
    }

    pub fn test_service_for(user: User) -> Arc<HomeService> {
        HomeService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedIdentity(user)),
            Arc::new(FixedPlatform("2.37.1".into())),
            Arc::new(MemoryBlobUploader::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use launchpad_store::{MemoryBlobUploader, RedbStore};

    use super::testing::{test_service, test_user};
    use super::{FixedIdentity, FixedPlatform, HomeService};
    use crate::model::{LandingNode, LandingNodeType, ROOT_PARENT};
    use crate::service::tree::tests::persisted;

    #[test]
    fn test_upload_file_returns_url() {
        let svc = test_service();
        let url = svc.upload_file("logo.png", b"\x89PNG").unwrap();
        assert_eq!(url, "blob:logo.png");
    }

    #[test]
    fn test_service_over_redb_store() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let store = Arc::new(RedbStore::open(tmp.path()).unwrap());
        let svc = HomeService::new(
            store,
            Arc::new(FixedIdentity(test_user())),
            Arc::new(FixedPlatform("2.37.1".into())),
            Arc::new(MemoryBlobUploader::new()),
        );

        svc.save_tree(&LandingNode::from_persisted(
            persisted("r1", ROOT_PARENT, LandingNodeType::Root, None),
            vec![LandingNode::from_persisted(
                persisted("s1", "r1", LandingNodeType::Section, None),
                Vec::new(),
            )],
        ))
        .unwrap();

        let tree = svc.get_tree_by_id("r1").unwrap();
        assert_eq!(tree.children[0].id, "s1");
    }
}
