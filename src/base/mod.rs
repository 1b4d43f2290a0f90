//! The base module contains the source file model and diagnostics shared by all phases.

pub mod source_file;

mod error;
#[doc(inline)]
pub use error::{Error, Result};

mod diagnostic;
pub use diagnostic::{Handler, PrintHandler, SilentHandler};

mod file_provider;
pub use file_provider::{FileProvider, FsProvider, MemoryProvider};

pub mod log;
