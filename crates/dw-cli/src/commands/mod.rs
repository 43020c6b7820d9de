//! CLI command implementations

pub(crate) mod apply;
pub(crate) mod common;
pub(crate) mod init;
pub(crate) mod rollback;
pub(crate) mod status;
