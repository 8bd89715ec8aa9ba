pub(crate) mod transition;
pub(crate) mod value;
