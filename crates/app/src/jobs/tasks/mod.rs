pub mod extract;
pub mod search;
