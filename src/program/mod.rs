pub(crate) mod op;
pub(crate) mod parse;
