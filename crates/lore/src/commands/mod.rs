//! CLI command implementations.

pub(crate) mod nav;
pub(crate) mod render;
pub(crate) mod serve;

pub(crate) use nav::NavArgs;
pub(crate) use render::RenderArgs;
pub(crate) use serve::ServeArgs;
