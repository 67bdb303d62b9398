pub mod errors;
pub mod usercases;
