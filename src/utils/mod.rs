pub mod crypto;
pub mod markdown;
pub mod retry;
pub mod sanitize;
pub mod validation;
