#[macro_use]
mod macros;
mod profile_client;

pub use profile_client::ProfileClient;
