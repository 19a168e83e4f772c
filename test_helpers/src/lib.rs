//! Test helpers shared across the jest-mongodb-config workspace.
//!
//! - [`env`] scopes environment variable changes.
//! - [`cwd`] scopes working directory changes.
//! - [`fixture`] writes configuration files into throwaway directories.
//! - [`runtime`] checks for the external programs the importer spawns.

pub mod cwd;
pub mod env;
pub mod fixture;
pub mod runtime;
