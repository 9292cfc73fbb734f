pub mod mirror;
pub mod query;
pub mod stream;

pub use query::{MediaType, Query, QueryError};
pub use stream::{Caption, StreamDescriptor, StreamFlag, StreamType};
