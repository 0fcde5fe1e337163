pub mod error;
pub mod value;
pub mod scope;
pub mod functions;

pub mod prelude {
    pub use super::{
        error::*,
        value::*,
        scope::*,
        functions::*
    };
}

#[cfg(test)]
mod tests;
