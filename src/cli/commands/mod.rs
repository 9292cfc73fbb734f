mod init;
mod providers;
mod resolve;
mod source;

pub use init::cmd_init;
pub use providers::cmd_providers;
pub use resolve::cmd_resolve;
pub use source::cmd_source;
