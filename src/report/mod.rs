pub mod collector;
pub mod console;
pub mod json;
pub mod markdown;
pub mod report_model;
