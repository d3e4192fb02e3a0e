// Shared helpers
pub mod encoding;
pub mod io;

pub use encoding::{Charset, EncodingError};
pub use io::LookaheadReader;
