//! Tree-sitter parser subsystem: Python test discovery, decorator lowering,
//! marker matching.

pub mod decorators;
pub mod docstring;
pub mod error_tolerant;
pub mod python;
pub mod types;

pub use decorators::MarkerMatcher;
pub use python::PythonTestParser;
pub use types::{ArgValue, CallArg, DecoratorExpr, DiscoveredTest, DuplicateTest, ParsedFile};
