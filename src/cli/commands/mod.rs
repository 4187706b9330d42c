//! Subcommands of the `qlearn-ttt` binary

pub mod evaluate;
pub mod play;
pub mod train;
