pub mod list;
pub mod run;

pub use list::list_command;
pub use run::run_command;
