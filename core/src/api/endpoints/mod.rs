pub mod coverage;
pub mod health;
pub mod predictions;
pub mod students;
pub mod visits;
