pub mod cache;
pub mod error;
pub mod fetch;
pub mod helpers;
pub mod http;
pub mod meta;
pub mod models;
pub mod settings;
pub mod talker;

pub use cache::*;
pub use error::*;
pub use fetch::*;
pub use helpers::*;
pub use http::*;
pub use meta::*;
pub use models::*;
pub use settings::*;
pub use talker::*;
