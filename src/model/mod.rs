mod encoding;
mod key_material;
mod key_type;
mod layout;
mod phase;

pub use encoding::{CorrectionLevel, EncodingSpec};
pub use key_material::{KeyPair, PrivateKey, PublicKey};
pub use key_type::{KeyType, KeyTypeError};
pub use layout::{BarcodePlacement, Layout};
pub use phase::GenerationPhase;
