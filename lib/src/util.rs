pub mod dirs;
pub mod port;
pub mod suggest;
