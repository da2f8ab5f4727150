// logtriage - core/mod.rs
//
// Pure logic shared by the tools. Core layer: accepts strings and Write
// trait objects, never touches the filesystem directly.

pub mod context;
pub mod fixture;
pub mod history;
pub mod report;
