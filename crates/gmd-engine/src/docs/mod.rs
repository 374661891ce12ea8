//! The documentation aggregate and the entities it hands to renderers.

pub mod comment;
pub mod example;
pub mod func;
pub mod location;
pub mod package;
pub mod ty;
pub mod value;

pub use comment::{summary, Block, Doc};
pub use example::Example;
pub use func::Func;
pub use location::Location;
pub use package::Package;
pub use ty::Type;
pub use value::Value;
