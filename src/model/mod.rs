pub mod adjustment;
pub mod attendance;
pub mod overtime;
pub mod role;
