mod article;
mod query;

pub use article::{Article, SourceInfo};
pub use query::QueryResult;
