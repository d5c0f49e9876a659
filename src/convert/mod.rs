//! Conversions between native values and raw ABI values.
//!
//! Arguments are converted by matching each native value against the
//! parameter type declared in the ABI. Results are converted by consulting
//! the declared native return type: scalars and arrays go through a fixed
//! chain of scalar handlers, while multi-value results populate a composite.

mod input;
mod output;

pub use self::{
    input::{convert_argument, convert_arguments},
    output::convert_result,
};
