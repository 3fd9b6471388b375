pub mod config;
pub mod error;
pub mod logging;

pub mod curl;
pub mod debug_dump;
pub mod env;
pub mod feed;
pub mod note_ref;
pub mod paths;
pub mod payload;
pub mod signer;
