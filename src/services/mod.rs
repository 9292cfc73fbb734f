pub mod embed_service;
pub use embed_service::{BOUNDARY_MESSAGE, Embed, EmbedError};

pub mod embed_service_impl;
pub use embed_service_impl::MirrorEmbed;

pub mod episodes;
pub mod playlist;

pub mod progress;
pub use progress::{NoProgress, ProgressGuard, ProgressSink, ResolutionState};

pub mod registry;
pub use registry::EmbedRegistry;

pub mod search;
pub use search::MatchedItem;

pub mod session;
pub use session::SessionToken;

pub mod source;
pub use source::{EmbedLink, MirrorSource, SourceOutput};
