//! Frame sources.

pub(crate) mod source;
