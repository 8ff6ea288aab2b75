//! Application use cases (business logic orchestration).

mod transform_stylesheet;

pub use transform_stylesheet::*;
