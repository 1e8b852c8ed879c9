pub(crate) mod amalgam;
