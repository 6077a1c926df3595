pub mod attendance;
pub mod external;
pub mod students;
