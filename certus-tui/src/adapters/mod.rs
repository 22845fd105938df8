mod dev_backend;
mod remote;

pub use dev_backend::DevBackend;
pub use remote::{RemoteAuth, RemoteLedger};
