use crate::{environment::prelude::EnvironmentError, utils::prelude::SrcSpan};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problems {
    errors: Vec<AnalyzeError>,
    warnings: Vec<Warning>,
}

impl Problems {
    pub fn error(&mut self, error: AnalyzeError) {
        self.errors.push(error)
    }

    pub fn take_errors(&mut self) -> Vec<AnalyzeError> {
        std::mem::take(&mut self.errors)
    }

    pub fn warning(&mut self, warning: Warning) {
        self.warnings.push(warning)
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn sort(&mut self) {
        self.errors.sort_by_key(|e| e.location().start);
        self.warnings.sort_by_key(|w| w.location().start);
    }
}

/// Problems found before running. Any of them stops the program from
/// being executed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalyzeError {
    /// A variable read or assigned where no declaration is in scope.
    ///
    /// ```text
    /// int main() {
    ///     y = 1; <- Variable not declared: `y`
    ///     return 0;
    /// }
    /// ```
    VariableNotDeclared {
        location: SrcSpan,
        variable: String,
    },
    /// A second declaration of a name in the same scope. Parameters share
    /// a scope with the top level of the function body.
    ///
    /// ```text
    /// int f(int a, int a) { ... } <- Variable redeclaration: `a`
    /// ```
    VariableRedeclaration {
        location_a: SrcSpan,
        location_b: SrcSpan,
        variable: String,
    },
    /// A call to a function that is defined nowhere in the program.
    FunctionNotDeclared {
        location: SrcSpan,
        function: String,
    },
    FunctionRedeclaration {
        location_a: SrcSpan,
        location_b: SrcSpan,
        function: String,
    },
    /// A user function named like a builtin.
    BuiltinRedefinition {
        location: SrcSpan,
        function: String,
    },
    /// A call whose argument count differs from the parameter count.
    ///
    /// ```text
    /// int add(int a, int b) { return a + b; }
    /// int main() {
    ///     return add(1); <- `add` takes 2 argument(s) but 1 were given
    /// }
    /// ```
    ArityMismatch {
        location: SrcSpan,
        function: String,
        expected: usize,
        got: usize,
    },
}

impl AnalyzeError {
    /// Where the error is reported. For redeclarations this is the second
    /// declaration.
    pub fn location(&self) -> SrcSpan {
        match self {
            AnalyzeError::VariableNotDeclared { location, .. }
            | AnalyzeError::VariableRedeclaration { location_b: location, .. }
            | AnalyzeError::FunctionNotDeclared { location, .. }
            | AnalyzeError::FunctionRedeclaration { location_b: location, .. }
            | AnalyzeError::BuiltinRedefinition { location, .. }
            | AnalyzeError::ArityMismatch { location, .. } => *location
        }
    }
}

/// Lints. None of them stop a program from running.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Warning {
    /// A local or parameter that is never read.
    ///
    /// ```text
    /// int main() {
    ///     int unused = 1; <- Unused variable
    ///     return 0;
    /// }
    /// ```
    UnusedVariable {
        name: String,
        location: SrcSpan
    },
    /// Statements that follow a `return` in the same block.
    UnreachableCode {
        location: SrcSpan
    },
    /// `if (0) { ... }`
    UnreachableIfClause {
        location: SrcSpan
    },
    /// `if (1) { ... } else { ... }`
    UnreachableElseClause {
        location: SrcSpan
    },
    /// `while (1) { ... }` with no `return` anywhere in its body.
    InfiniteLoop {
        location: SrcSpan
    },
    /// `while (0) { ... }`
    UnreachableWhileClause {
        location: SrcSpan
    }
}

impl Warning {
    pub fn location(&self) -> SrcSpan {
        match self {
            Warning::UnusedVariable { location, .. }
            | Warning::UnreachableCode { location }
            | Warning::UnreachableIfClause { location }
            | Warning::UnreachableElseClause { location }
            | Warning::InfiniteLoop { location }
            | Warning::UnreachableWhileClause { location } => *location
        }
    }
}

impl From<EnvironmentError> for AnalyzeError {
    fn from(error: EnvironmentError) -> Self {
        match error {
            EnvironmentError::DuplicateFunction { name, first, second } => AnalyzeError::FunctionRedeclaration {
                location_a: first,
                location_b: second,
                function: name
            },
            EnvironmentError::BuiltinRedefinition { name, location } => AnalyzeError::BuiltinRedefinition {
                location,
                function: name
            },
            EnvironmentError::Redeclaration { name, first, second } => AnalyzeError::VariableRedeclaration {
                location_a: first,
                location_b: second,
                variable: name
            },
            EnvironmentError::UndeclaredName { name, location } => AnalyzeError::VariableNotDeclared {
                location,
                variable: name
            },
            EnvironmentError::UndeclaredFunction { name, location } => AnalyzeError::FunctionNotDeclared {
                location,
                function: name
            },
        }
    }
}
