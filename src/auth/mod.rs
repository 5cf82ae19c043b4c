//! Authentication
//!
//! Handles:
//! - Signed access tokens (issue/verify)
//! - Credential resolution into a request principal
//! - Password hashing for registration and login

mod password;
mod resolver;
mod token;

pub use password::{hash_password, verify_password, PasswordHash};
pub use resolver::{AuthFailure, AuthResolver, MaybePrincipal, Principal};
pub use token::AuthTokens;
