pub(crate) mod compare;
pub(crate) mod exact;
pub(crate) mod helpers;
pub(crate) mod simulate;
