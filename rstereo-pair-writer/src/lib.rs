pub mod pair_writer;

pub use pair_writer::{PairLayout, PairWriter, SaveError, SavedPair};
