pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use handler::SigningSecret;
pub use handler::TOKEN_VALIDITY_SECONDS;
