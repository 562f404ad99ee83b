pub(crate) mod dispatch;
pub(crate) mod machine;
pub(crate) mod operand;
