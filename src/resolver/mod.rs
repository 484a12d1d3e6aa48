//! Vendor installation discovery.

pub mod installation;
pub mod store;

pub use installation::{InstallationResolver, DEFAULT_INSTALL_ROOT};
pub use store::{ConfigStore, SystemStore};
