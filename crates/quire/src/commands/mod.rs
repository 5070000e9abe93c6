//! CLI command implementations.

pub(crate) mod feed;
pub(crate) mod rebuild;
pub(crate) mod show;

pub(crate) use feed::FeedArgs;
pub(crate) use rebuild::{RebuildArgs, rebuild_all};
pub(crate) use show::ShowArgs;
