mod owner_token;
mod signing_key;

pub use owner_token::{OwnerToken, OwnerTokenError};
pub use signing_key::SigningKey;
