// Keygate: Gateway Module
//
// The credential gateway: validates requests, forwards them to the
// configured backend and authenticator, and reports outcomes as statuses.

mod credential;

pub use credential::CredentialGateway;
