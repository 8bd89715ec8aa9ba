pub(crate) mod engine;
pub(crate) mod instruction;
pub(crate) mod renderer;
