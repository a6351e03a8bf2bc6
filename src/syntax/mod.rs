//! The recognizer core: character cursor, grammar procedures, and the
//! whole-program driver.
//!
//! Text flows in one direction: raw source in, a diagnostic list out. Each
//! call to [`parse`] builds a fresh cursor over its own text, so concurrent
//! validation of different units needs no locking.

mod cursor;
mod grammar;
mod validator;

pub use validator::{parse, verify};
