//! CLI command implementations

pub(crate) mod common;
pub(crate) mod deploy;
pub(crate) mod plan;
pub(crate) mod split;
pub(crate) mod status;
pub(crate) mod verify;
