pub mod backup;
pub mod compare;
pub mod models;
pub mod store;
pub mod utils;
