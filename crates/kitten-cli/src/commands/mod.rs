pub mod compile;
pub mod dump;
pub mod render;
pub mod run;
pub mod run_common;
pub mod trace;
