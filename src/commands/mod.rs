pub mod cache;
pub mod check;
pub mod schema;
pub mod up;
