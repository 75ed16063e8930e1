pub mod claims;
pub mod credentials;
pub mod digest;
pub mod jwt;
pub mod login;

pub use claims::{AuthenticatedIdentity, ClaimSet};
pub use credentials::{
    verify_credentials, AuthenticationError, Credentials, StoredIdentity, VerifiedIdentity,
};
pub use digest::{digest, DigestScheme};
pub use jwt::{decode, issue, mint_access_token, TokenError};
pub use login::{login, IdentityLookup, LoginOutcome};
