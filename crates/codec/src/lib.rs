//! Scene JSON codec: bit-exact interchange between level-editor documents
//! and the in-memory [`Scene`].
//!
//! [`WorldWriter`] turns a scene into a `serde_json::Value` (or text, or a
//! file) and [`WorldReader`] turns one back. Neither depends on the other;
//! they share only the number encodings in [`float`].
//!
//! # Invariants
//! - Decoding what the writer produced reproduces every float bit for bit,
//!   in either [`FloatMode`].
//! - Cross-references are array indices. Body indices follow the world's
//!   body order, joint indices follow the order joints were emitted, with
//!   gear joints always after the joints they couple.
//! - A value equal to its documented default may be omitted; absence always
//!   means that default.
//! - Every decode starts from an empty scene.

pub mod error;
pub mod float;
pub mod reader;
pub mod scene;
pub mod template;
pub mod writer;

pub use error::{CodecError, Diagnostic};
pub use float::{FloatMode, decode_float, encode_float, float_to_hex, hex_to_float};
pub use reader::{Decoded, ReaderOptions, WorldReader};
pub use scene::Scene;
pub use template::SceneTemplate;
pub use writer::{WorldWriter, WriterOptions};
