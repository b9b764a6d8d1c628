pub(crate) mod net;
