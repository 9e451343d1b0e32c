pub mod books;
pub mod user;

pub use books::BookQueries;
pub use user::UserQueries;

pub(crate) mod prelude {
    pub(crate) use std::sync::Arc;

    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::Database;
    pub(crate) use crate::error::AppError;
    pub(crate) use crate::graphql::auth::{AuthExt, AuthGuard};
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::BookSearch;
}
