//! Filesystem operations used by relocation.

mod atomic;
mod copy;
mod duplicate;
mod helpers;
mod io_copy;
mod relocate;
mod util;

pub use duplicate::{resolve_destination, OnDuplicate};
pub use relocate::relocate_file;
