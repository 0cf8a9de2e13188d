pub mod local;
pub mod remote;
pub mod types;

pub use local::LocalPeliasProvider;
pub use remote::RemoteOrsProvider;
