pub mod coin_repository;
pub mod fetch_gate;
pub mod session_manager;
