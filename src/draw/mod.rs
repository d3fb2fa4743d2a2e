pub(crate) mod context;
pub(crate) mod record;
pub(crate) mod state;
