pub use self::bitset::*;
pub use self::sparse::*;

mod bitset;
mod sparse;
