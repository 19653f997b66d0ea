pub mod announcement;
pub mod session;

pub use announcement::*;
pub use session::*;
