pub mod cli;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod output;
pub mod parser;
