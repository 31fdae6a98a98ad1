pub mod shell;
pub mod tokenize;

pub use shell::split_segments;
pub use tokenize::{base_command, env_vars, tokenize};
