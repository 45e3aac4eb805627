//! Redaction engine for public documentation output
//!
//! Sensitive fields (MAC addresses, hardware serials, API tokens, CPU
//! flags, usernames, email addresses) are replaced with fixed sentinels or
//! stable pseudonyms before they reach the generated documents. Every rule
//! is opt-in via [`RedactionPolicy`], pure, idempotent, and total: a
//! disabled flag, an absent key, or an empty value is a silent
//! pass-through, never an error. Document generation must not abort because
//! one field was malformed or missing.

pub mod policy;
pub mod redactor;

pub use policy::RedactionPolicy;
pub use redactor::Redactor;
