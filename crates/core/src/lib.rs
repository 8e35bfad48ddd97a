pub mod args;
pub mod bundle;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod exchange;
pub mod provider;
pub mod router;
pub mod schema;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::exchange::{AddonRequest, AddonResponse};
    pub use crate::provider::{Provider, Reply, RequestContext};
    pub use crate::router::{route, Router};
    pub use crate::schema::*;
}
