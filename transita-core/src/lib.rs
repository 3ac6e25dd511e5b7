pub mod identity;
pub mod session;

pub use identity::Identity;
pub use session::SessionStore;
