use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Store unavailable: {0}")]
    Store(#[from] redis::RedisError),

    #[error("Corrupt record at {key}: {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed number at {key}: {value:?}")]
    MalformedNumber { key: String, value: String },

    #[error("Malformed date at {key}: {value:?}")]
    MalformedDate { key: String, value: String },
}
