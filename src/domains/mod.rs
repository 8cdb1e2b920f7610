pub mod blog;
pub mod users;
