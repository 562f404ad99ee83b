pub(crate) mod codec;
pub(crate) mod float_image;
pub(crate) mod store;
