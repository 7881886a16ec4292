pub mod system;
pub mod users;

pub use system::*;
pub use users::*;
