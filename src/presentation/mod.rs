// Presentation layer - CLI parsing and output rendering
pub mod cli;
pub mod output;
