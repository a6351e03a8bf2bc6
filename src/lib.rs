pub use crate::diagnostics::{Diagnostic, HornlintError, Verdict};
pub use crate::syntax::{parse, verify};

pub mod cli;
pub mod diagnostics;
pub mod discovery;
pub mod syntax;
