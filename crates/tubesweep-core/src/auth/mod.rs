mod authenticator;
mod credentials;
mod device;
mod revoke;

pub use authenticator::Authenticator;
pub use credentials::{
    ClientSecrets, Credential, CredentialStore, FileCredentialStore, YOUTUBE_SCOPE,
};
pub use device::{DeviceAuthorization, DeviceFlow, PollStatus, TokenGrant};
pub use revoke::{revoke_token, RevokeStatus};
