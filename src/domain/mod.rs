pub mod cooldown;
pub mod display_name;
pub mod profile;

pub use cooldown::*;
pub use display_name::*;
pub use profile::*;
