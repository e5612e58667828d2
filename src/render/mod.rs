//! Offline rendering of whole files.

pub(crate) mod batch;
