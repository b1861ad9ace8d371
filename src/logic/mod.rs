mod document;
mod encoding;
pub mod postscript;

pub use document::assemble;
pub use encoding::select_encoding;
