pub mod account;
pub mod payment;

// Re-export all entities
pub use account::*;
pub use payment::*;
