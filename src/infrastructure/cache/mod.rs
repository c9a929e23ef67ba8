//! Cache infrastructure - Response cache implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::CacheFactory;
pub use in_memory::InMemoryResponseCache;
pub use redis::RedisResponseCache;
