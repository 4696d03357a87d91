pub mod workdir;

pub use workdir::WorkdirGuard;
