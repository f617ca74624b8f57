//! Provider response handling.
//!
//! Chat-completion endpoints answer with a JSON document whose answer text
//! lives at `choices[0].message.content`. The [`normalize`] module turns
//! that payload into display-ready plain text.

pub mod normalize;

pub use normalize::{
    NormalizeError, PARSE_ERROR_PREFIX, PARSE_FAILED, clean_response, extract_content, normalize,
};
