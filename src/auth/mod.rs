pub mod credentials;
pub mod keychain;
pub mod profile;
