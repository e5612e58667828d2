//! Live preview: paced JPEG frames pulled one at a time.

pub(crate) mod session;
