pub(crate) mod atoms;
pub(crate) mod detail;
pub(crate) mod gallery;
pub(crate) mod shell;
pub(crate) mod sidebar;
pub(crate) mod watch_toggle;
