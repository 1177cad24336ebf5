//! Cache Configuration Module
//!
//! This module provides configuration structures for all cache algorithm implementations.
//! Each cache type has its own dedicated configuration struct that encapsulates
//! algorithm-specific parameters.
//!
//! # Design Philosophy
//!
//! Each cache is created using its configuration struct as the **single entry point**.
//! This provides several benefits:
//!
//! - **Consistent API**: All caches are created the same way: `Cache::from_config(config)`
//! - **Type safety**: All required parameters must be provided at construction
//! - **Extensible**: New parameters can be added without breaking existing code
//!
//! # Cache Configs
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | [`LruCacheConfig`] | [`LruCache`](crate::LruCache) | Least Recently Used |
//! | [`LfuCacheConfig`] | [`LfuCache`](crate::LfuCache) | Least Frequently Used |
//! | [`ArcCacheConfig`] | [`ArcCache`](crate::ArcCache) | Adaptive Replacement Cache |
//! | [`LruKCacheConfig`] | [`LruKCache`](crate::LruKCache) | LRU-K admission filter |
//! | [`HashLruCacheConfig`] | [`HashLruCache`](crate::HashLruCache) | Sharded LRU |
//! | [`HashLfuCacheConfig`] | [`HashLfuCache`](crate::HashLfuCache) | Sharded LFU |
//!
//! # Examples
//!
//! ```
//! use polycache::config::LruCacheConfig;
//! use polycache::LruCache;
//! use std::num::NonZeroUsize;
//!
//! // Create config with required capacity
//! let config = LruCacheConfig::new(NonZeroUsize::new(1000).unwrap());
//!
//! // Create cache from config
//! let cache: LruCache<String, i32> = LruCache::from_config(config);
//! ```

pub mod arc;
pub mod hash_lfu;
pub mod hash_lru;
pub mod lfu;
pub mod lru;
pub mod lru_k;

pub use arc::ArcCacheConfig;
pub use hash_lfu::HashLfuCacheConfig;
pub use hash_lru::HashLruCacheConfig;
pub use lfu::LfuCacheConfig;
pub use lru::LruCacheConfig;
pub use lru_k::LruKCacheConfig;
