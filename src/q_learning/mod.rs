//! Tabular Q-learning
//!
//! Off-policy temporal difference control over exact position keys:
//!
//! ```text
//! Q(s,a) <- Q(s,a) + α [ r + γ max_a' Q(s',a') - Q(s,a) ]
//! ```
//!
//! with the bootstrap term dropped on terminal transitions. Actions are
//! chosen ε-greedily during training and purely greedily for evaluation,
//! with ties among maximal actions broken uniformly at random.
//!
//! ## Usage Example
//!
//! ```no_run
//! use qlearn_ttt::q_learning::{QLearningAgent, QLearningConfig};
//!
//! let config = QLearningConfig::default()
//!     .with_learning_rate(0.2)
//!     .with_discount_factor(0.9)
//!     .with_epsilon(0.3, 0.2, 0.999);
//! let agent = QLearningAgent::new(config)?.with_seed(7);
//! # Ok::<(), qlearn_ttt::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod frozen;
pub mod serialization;
pub mod value_table;

pub use agent::{Greedy, QLearningAgent};
pub use config::QLearningConfig;
pub use frozen::FrozenAgent;
pub use serialization::{EnvironmentKind, SavedAgent, TrainingMetadata};
pub use value_table::ValueTable;
