//! Command handler layer.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output stable.

pub mod pins;
pub mod relicense;
pub mod serve;

pub use pins::handle_pins;
pub use relicense::handle_relicense;
pub use serve::handle_serve;
