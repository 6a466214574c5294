mod partial_success ;
mod merge ;

pub use partial_success::{ PartialSuccess, PartialResult };
pub use merge::Merge ;
