pub mod date_parser;

pub use date_parser::parse_point_in_time;
