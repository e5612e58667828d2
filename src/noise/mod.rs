//! Pre-generated noise textures.

pub(crate) mod pool;
