mod files;
mod programs;
mod shell;
mod status;
mod web;

pub use files::{FileCommand, cmd_files};
pub use programs::{ProgramCommand, cmd_programs};
pub use shell::cmd_shell;
pub use status::cmd_status;
pub use web::{WebCommand, cmd_web};
