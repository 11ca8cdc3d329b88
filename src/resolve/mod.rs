mod pair;

pub use pair::{DatabasePair, PairingRule, resolve};
