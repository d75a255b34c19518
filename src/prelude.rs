/*!
Common imports for error handling with Snafu.
*/

pub use snafu::{ensure, OptionExt, ResultExt, Snafu};
