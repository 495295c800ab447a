pub mod coin;
pub mod session;
pub mod user;
