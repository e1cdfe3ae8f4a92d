#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

use error_stack::{Context, Report};

pub mod text;

pub trait ContextExt: Context + Sized {
    #[track_caller]
    fn report(self) -> Report<Self> {
        error_stack::report!(self)
    }
}

impl<E: Context + Sized> ContextExt for E {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(thiserror::Error, Debug, PartialEq)]
    enum TestError {
        #[error("Parsing failed")]
        Parse,
    }

    #[test]
    fn report_has_context() {
        let report = TestError::Parse.report();
        assert_eq!(report.current_context(), &TestError::Parse);
    }
}
