pub mod connection;

pub use connection::{DbConn, connect, run_migrations};

#[cfg(test)]
pub mod test_utils;
