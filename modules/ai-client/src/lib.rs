pub mod claude;
pub mod error;
pub mod schema;
pub mod util;

pub use claude::Claude;
pub use error::AiError;
pub use schema::StructuredOutput;
pub use util::truncate_to_char_boundary;
