pub mod auth;
pub mod clean;
pub mod revoke;
