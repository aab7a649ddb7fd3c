pub mod user;
pub mod repo;
pub mod report;

pub use user::*;
pub use repo::*;
pub use report::*;
