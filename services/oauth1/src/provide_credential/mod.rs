mod env;
pub use env::{EnvClientCredentialProvider, EnvCredentialProvider};

mod r#static;
pub use r#static::{StaticClientCredentialProvider, StaticCredentialProvider};
