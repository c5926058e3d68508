use std::fmt::{Debug, Display};
use std::path::{Path, PathBuf};

use itertools::Itertools;

pub trait ErrorType: Display + Debug + PartialEq {}

#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Location {
    // A location for the file as a whole
    pub fn in_file(file: &Path) -> Self {
        Location {
            file: file.to_path_buf(),
            line: 0
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

impl<T: ErrorType> std::error::Error for Error<T> {}

pub type Errors<T> = Vec<Error<T>>;

// One error per line
pub fn display_errors<T: ErrorType>(errors: &Errors<T>) -> String {
    errors.iter().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Broken;

    impl ErrorType for Broken {}

    impl Display for Broken {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "broken")
        }
    }

    #[test]
    fn location_omits_line_zero() {
        let file = PathBuf::from("grammar.bnf");
        assert_eq!(Location::in_file(&file).to_string(), "grammar.bnf");
        assert_eq!(Location { file, line: 4 }.to_string(), "grammar.bnf:4");
    }

    #[test]
    fn errors_display_one_per_line() {
        let errors = vec![
            Error { location: Location { file: PathBuf::from("a"), line: 1 }, error: Broken },
            Error { location: Location { file: PathBuf::from("a"), line: 2 }, error: Broken },
        ];

        let shown = display_errors(&errors);
        assert_eq!(shown.lines().count(), 2);
        assert!(shown.contains("[a:2]"));
    }
}
