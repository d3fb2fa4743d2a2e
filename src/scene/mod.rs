pub(crate) mod config;
pub(crate) mod paper;
pub(crate) mod plan;
