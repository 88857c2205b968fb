pub mod fixtures;

pub use fixtures::handler_pair;
