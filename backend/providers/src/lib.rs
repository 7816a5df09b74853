pub mod invoker;
pub mod mock;
pub mod openrouter;
pub mod profiles;

pub use invoker::{Invoker, InvokerSet};
pub use mock::MockProvider;
pub use openrouter::OpenRouterProvider;
pub use profiles::RoleProfile;
