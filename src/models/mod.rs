pub mod request;
pub mod task;
pub mod user;

pub use request::*;
pub use task::*;
pub use user::*;
