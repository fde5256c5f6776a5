pub mod client;
mod fetch;
pub mod keypool;
pub mod normalize;

pub use client::SerpClient;
pub use keypool::{KeyPools, Service};
pub use normalize::{
    news_from_value, normalize_interest_over_time, normalize_news, normalize_queries,
    normalize_topics, query_from_value, topic_from_value,
};
