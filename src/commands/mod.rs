//! CLI command handlers.

mod bulkdownload;
mod extract;
mod modules;

pub(crate) use bulkdownload::run_bulkdownload_command;
pub(crate) use extract::run_extract_command;
pub(crate) use modules::run_modules_command;
