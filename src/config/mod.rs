//! Configuration module

mod site;

pub use site::ColorsConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
