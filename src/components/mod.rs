pub mod class_header;
pub mod sidebar;
pub mod stats;
pub mod status_badge;
pub mod student_table;
pub mod toast;
