//!  Storage is organized through [kv::KeyValueStore].
//!  The basic idea is:
//!   - Every collection lives under a single string key, encoded as json.
//!   - [file_store::FileStore] keeps one file per key inside a directory.
//!   - [kv::MemoryStore] keeps values in a map and is used for testing.

pub mod entities;
pub mod file_store;
pub mod kv;
