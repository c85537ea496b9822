//! Helper functions shared by the components and the generator

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
