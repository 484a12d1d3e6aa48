//! Activation command building.

pub mod command;

pub use command::{
    script_arch, visual_studio_tag, ActivationCommand, CommandBuilder, ShellKind, SENTINEL_VAR,
};
