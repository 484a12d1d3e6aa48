//! High-level operations.

pub mod compilervars;

pub use compilervars::{activation_scope, compute_diff_for, Activator};
