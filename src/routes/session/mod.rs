mod reset;

pub use reset::*;
