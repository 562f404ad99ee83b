pub(crate) mod mat4;
pub(crate) mod vec4;
