mod client;
mod params;
mod retry;

pub use client::NewsClient;
pub use params::{Capability, Category, Query, SortOrder, MAX_PAGE_SIZE};
pub use retry::RetryPolicy;
