//! Statement interpreter for rpnscript programs

mod eval;
mod rpn;
mod scope;
mod stack;
mod value;

pub use eval::{Interpreter, Signature};
pub use rpn::evaluate;
pub use scope::Scope;
pub use stack::{CallStack, Frame};
pub use value::Value;
