pub mod db;
pub mod elec;
pub mod error;
pub mod preprocess;
pub mod utils;
