use crate::error::ResourceError;

/// One opaque chunk of barcode library code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreambleFragment {
    /// Sort key, usually the file name
    pub name: String,
    pub text: String,
}

pub trait PreambleSource {
    /// All fragments, in no particular order
    fn fragments(&self) -> Result<Vec<PreambleFragment>, ResourceError>;
}
