//! [`StateStore`](crate::domain::store::StateStore) implementations.

mod memory;
mod remote;

pub use memory::InMemoryStateStore;
pub use remote::RemoteStateStore;
