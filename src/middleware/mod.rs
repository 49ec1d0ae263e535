pub mod auth_guard;
pub mod session;
