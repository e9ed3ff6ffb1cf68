pub mod list;
pub mod report;
pub mod show;
pub mod submit;
pub mod watch;
