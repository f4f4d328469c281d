pub mod dom;
pub mod effects;
pub mod host;
pub mod nav;
pub mod pager;
