//! Audio post-processing of silent renders.

pub(crate) mod mux;
