//! Check-then-act policies over the store traits. Each operation reads the
//! current state, applies the timekeeping rules, then writes.
pub mod attendance;
pub mod overtime;
pub mod report;
