//! Authentication: credentials, one-time codes, bearer tokens and the
//! lifecycle service that ties them together.

pub mod otp;
pub mod password;
pub mod service;
pub mod token;
pub mod validation;

pub use service::{AuthOutcome, AuthPolicy, AuthService, IssuedTokens, OtpIssued, RegisterData};
pub use token::{Claims, TokenIssuer};
