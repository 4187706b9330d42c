//! Ports (trait boundaries) between the learning core and its collaborators.
//!
//! Environments, policies, training observers and table storage are all
//! owned here as traits; concrete implementations live in `tictactoe`,
//! `line_world`, `q_learning`, `pipeline` and `adapters`.

pub mod environment;
pub mod observer;
pub mod policy;
pub mod repository;

pub use environment::{Environment, Step};
pub use observer::Observer;
pub use policy::{Learner, Policy, Transition};
pub use repository::TableRepository;
