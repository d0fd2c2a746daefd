mod demo_seed;
mod request_builder;
mod response_parser;
mod stats_aggregator;

pub use demo_seed::*;
pub use request_builder::*;
pub use response_parser::*;
pub use stats_aggregator::*;
