pub mod cookie;
pub mod fetcher;
pub mod mirror;

pub use cookie::make_cookie_header;
pub use fetcher::{FetchRequest, Fetcher, ReqwestFetcher, fetch_json};
pub use mirror::MirrorClient;
