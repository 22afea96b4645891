//! Cross-program invocation helpers

pub mod spl_token;
pub mod system;
