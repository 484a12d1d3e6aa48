//! Core data types shared by every stage of activation.

pub mod identity;
pub mod platform;

pub use identity::{major_version, IdentityOverrides, Settings, ToolchainIdentity};
pub use platform::HostPlatform;
