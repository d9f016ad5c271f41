mod account;
mod common;
mod exploit;
mod host;
mod scan;
mod search;

pub use account::*;
pub use common::*;
pub use exploit::*;
pub use host::*;
pub use scan::*;
pub use search::*;
