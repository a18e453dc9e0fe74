//! Attendance rules: session windows, lateness, credited minutes, and the
//! read-side folds used for daily views and range reports.
pub mod aggregate;
pub mod clock;
pub mod consolidate;
pub mod lateness;
pub mod session;
pub mod window;
pub mod worked;
