pub mod action;
pub mod node;
pub mod permission;
pub mod settings;
pub mod text;
pub mod user;

pub use action::{AccessMode, Action, ActionType, PersistedAction, ACTION_SCHEMA_VERSION};
pub use node::{
    LandingNode, LandingNodeType, PageRendering, PersistedLandingNode, ROOT_PARENT,
    UNORDERED_SORT_KEY,
};
pub use permission::{
    LandingPagePermission, LandingPagePermissionUpdate, Permission, SharingSetting,
    PUBLIC_ACCESS_NONE, PUBLIC_ACCESS_READ,
};
pub use settings::PersistedSettings;
pub use text::{TranslatableText, REFERENCE_LOCALE};
pub use user::{User, UserRole, AUTHORITY_ALL};
