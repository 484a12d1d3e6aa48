//! Environment snapshots, capture, diffing and scoped application.

pub mod capture;
pub mod diff;
pub mod scope;
pub mod snapshot;

pub use capture::{parse_dump, DumpFormat, DumpMarker, EnvCapture};
pub use diff::{EnvChange, EnvironmentDiff};
pub use scope::{EnvGuard, ProcessEnv, ScopedMutation};
pub use snapshot::EnvironmentSnapshot;
