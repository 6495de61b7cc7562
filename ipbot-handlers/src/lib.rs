//! # ipbot-handlers
//!
//! Command handlers and the IP lookup service behind `/home_ip`.

mod help;
mod home_ip;
mod ip;
mod start;
mod unknown;

pub use help::HelpHandler;
pub use home_ip::HomeIpHandler;
pub use ip::{HttpIpService, IpInfo, IpService};
pub use start::StartHandler;
pub use unknown::UnknownHandler;
