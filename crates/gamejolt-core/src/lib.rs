pub mod api;
pub mod error;
pub mod grammar;
pub mod params;
pub mod properties;
pub mod request;
pub mod sanitize;
pub mod serializer;
pub mod signature;
pub mod trophy;

pub use api::{ResponseEnvelope, Transport, STATUS_OK};
pub use error::{Error, Result};
pub use grammar::{
    decode_blocks, decode_properties, decode_status_line, BlockLayout, BlockListing, Decoded,
    Grammar, StatusLine, Terminator, KEY_LISTING_LAYOUT, TROPHY_LAYOUT,
};
pub use params::ParameterSet;
pub use properties::PropertyRecord;
pub use request::{
    Endpoint, RequestBuilder, SignedRequest, TrophyFilter, User, DEFAULT_API_ROOT,
    DEFAULT_API_VERSION,
};
pub use sanitize::{Base64Sanitizer, Sanitizer};
pub use serializer::{JsonSerializer, ObjectSerializer, SerializerError};
pub use signature::{sign, Signer};
pub use trophy::{parse_trophies, Difficulty, Trophy};
