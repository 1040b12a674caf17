pub mod output;
pub mod reddit;
