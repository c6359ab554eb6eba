pub(crate) mod cell;
pub(crate) mod traversal;
