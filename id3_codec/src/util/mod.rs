pub(crate) mod alloc;
pub(crate) mod text;
