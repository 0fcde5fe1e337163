use std::collections::HashMap;

use crate::{
    analyzer::prelude::{AnalyzeError, Problems, Warning},
    environment::prelude::FunctionTable,
    parser::prelude::{Block, Expression, FunctionDecl, Identifier, Module, Program, Statement, BUILTIN_PRINT},
    utils::prelude::{ModuleWarningEmitter, SrcSpan}
};

pub enum Outcome<T, E> {
    Ok(T),
    PartialFailure(T, E)
}

#[derive(Debug, Clone, Copy)]
struct Usage {
    location: SrcSpan,
    used: bool,
}

/// Walks every function once, mirroring the evaluator's scoping. Names and
/// calls that would fail at runtime are errors, suspicious code is a warning.
#[derive(Debug)]
pub struct ModuleAnalyzer<'p> {
    problems: Problems,
    scopes: Vec<HashMap<String, Usage>>,
    functions: Option<FunctionTable<'p>>,
}

impl<'p> ModuleAnalyzer<'p> {
    pub fn analyze(
        module: Module,
        warnings: &ModuleWarningEmitter
    ) -> Outcome<Module, Vec<AnalyzeError>> {
        let mut problems = ModuleAnalyzer::check(&module.program);

        problems.sort();

        for warning in problems.take_warnings() {
            warnings.emit(warning);
        }

        let errors = problems.take_errors();

        if errors.is_empty() {
            Outcome::Ok(module)
        } else {
            Outcome::PartialFailure(module, errors)
        }
    }

    fn check(program: &'p Program) -> Problems {
        let mut analyzer = ModuleAnalyzer {
            problems: Problems::default(),
            scopes: vec![],
            functions: None,
        };

        // Without a consistent table every call would be reported as well.
        match FunctionTable::register(program) {
            Ok(functions) => analyzer.functions = Some(functions),
            Err(error) => analyzer.problems.error(error.into())
        }

        for function in &program.functions {
            analyzer.analyze_function(function);
        }

        analyzer.problems
    }

    fn analyze_function(&mut self, function: &FunctionDecl) {
        // Parameters and the body's top-level locals share one frame scope.
        self.push_scope();

        for parameter in &function.parameters {
            self.declare(parameter);
        }

        self.analyze_statements(&function.body.statements);
        self.pop_scope();
    }

    fn analyze_block(&mut self, block: &Block) {
        self.push_scope();
        self.analyze_statements(&block.statements);
        self.pop_scope();
    }

    fn analyze_statements(&mut self, statements: &[Statement]) {
        let mut terminated = false;

        for (i, statement) in statements.iter().enumerate() {
            if terminated {
                let location = statements[i..].iter()
                    .fold(statement.location(), |span, next| span.merge(next.location()));

                self.problems.warning(Warning::UnreachableCode { location });

                for unreachable in &statements[i..] {
                    self.analyze_statement(unreachable);
                }

                return;
            }

            self.analyze_statement(statement);
            terminated = always_returns(statement);
        }
    }

    fn analyze_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VarDecl(decl) => {
                if let Some(value) = &decl.value {
                    self.analyze_expression(value);
                }

                self.declare(&decl.name);
            },
            Statement::Assignment(assignment) => {
                self.analyze_expression(&assignment.value);

                if self.lookup(&assignment.name.value).is_none() {
                    self.problems.error(AnalyzeError::VariableNotDeclared {
                        location: assignment.name.location,
                        variable: assignment.name.value.clone()
                    });
                }
            },
            Statement::Expression(expression) => self.analyze_expression(expression),
            Statement::If(stmt) => {
                self.analyze_expression(&stmt.condition);

                match literal_condition(&stmt.condition) {
                    Some(0) => self.problems.warning(Warning::UnreachableIfClause {
                        location: stmt.resolution.location
                    }),
                    Some(_) => if let Some(alternative) = &stmt.alternative {
                        self.problems.warning(Warning::UnreachableElseClause {
                            location: alternative.location
                        })
                    },
                    None => {}
                }

                self.analyze_block(&stmt.resolution);

                if let Some(alternative) = &stmt.alternative {
                    self.analyze_block(alternative);
                }
            },
            Statement::While(stmt) => {
                self.analyze_expression(&stmt.condition);

                match literal_condition(&stmt.condition) {
                    Some(0) => self.problems.warning(Warning::UnreachableWhileClause {
                        location: stmt.body.location
                    }),
                    Some(_) if !contains_return(&stmt.body.statements) => {
                        self.problems.warning(Warning::InfiniteLoop {
                            location: SrcSpan::from(stmt.location.start, stmt.condition.location().end)
                        })
                    },
                    _ => {}
                }

                self.analyze_block(&stmt.body);
            },
            Statement::Return(stmt) => {
                if let Some(value) = &stmt.value {
                    self.analyze_expression(value);
                }
            },
            Statement::Print(print) => {
                self.check_arity(BUILTIN_PRINT, 1, print.arguments.len(), print.location);

                for argument in &print.arguments {
                    self.analyze_expression(argument);
                }
            },
            Statement::Block(block) => self.analyze_block(block)
        }
    }

    fn analyze_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Int(_) | Expression::String(_) => {},
            Expression::Identifier(ident) => self.mark_used(ident),
            Expression::Binary(binary) => {
                self.analyze_expression(&binary.left);
                self.analyze_expression(&binary.right);
            },
            Expression::Unary(unary) => self.analyze_expression(&unary.operand),
            Expression::Call(call) => {
                self.check_call(&call.callee, call.arguments.len(), call.location);

                for argument in &call.arguments {
                    self.analyze_expression(argument);
                }
            }
        }
    }

    fn check_call(&mut self, callee: &Identifier, got: usize, location: SrcSpan) {
        if callee.value == BUILTIN_PRINT {
            self.check_arity(BUILTIN_PRINT, 1, got, location);
            return;
        }

        let Some(functions) = &self.functions else {
            return;
        };

        match functions.resolve(&callee.value, callee.location) {
            Ok(function) => self.check_arity(&callee.value, function.arity(), got, location),
            Err(error) => self.problems.error(error.into())
        }
    }

    fn check_arity(&mut self, function: &str, expected: usize, got: usize, location: SrcSpan) {
        if expected != got {
            self.problems.error(AnalyzeError::ArityMismatch {
                location,
                function: function.to_string(),
                expected,
                got
            });
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            for (name, usage) in scope {
                self.report_unused(name, usage);
            }
        }
    }

    fn declare(&mut self, name: &Identifier) {
        let usage = Usage { location: name.location, used: false };

        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        match scope.get(&name.value) {
            Some(first) => {
                let error = AnalyzeError::VariableRedeclaration {
                    location_a: first.location,
                    location_b: name.location,
                    variable: name.value.clone()
                };

                self.problems.error(error);
            },
            None => {
                scope.insert(name.value.clone(), usage);
            }
        }
    }

    fn mark_used(&mut self, name: &Identifier) {
        match self.lookup(&name.value) {
            Some(usage) => usage.used = true,
            None => self.problems.error(AnalyzeError::VariableNotDeclared {
                location: name.location,
                variable: name.value.clone()
            })
        }
    }

    fn lookup(&mut self, name: &str) -> Option<&mut Usage> {
        self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name))
    }

    fn report_unused(&mut self, name: String, usage: Usage) {
        if !usage.used {
            self.problems.warning(Warning::UnusedVariable { name, location: usage.location });
        }
    }
}

fn literal_condition(condition: &Expression) -> Option<i64> {
    match condition {
        Expression::Int(int) => Some(int.value),
        _ => None
    }
}

fn always_returns(statement: &Statement) -> bool {
    match statement {
        Statement::Return(_) => true,
        Statement::Block(block) => block.statements.iter().any(always_returns),
        Statement::If(stmt) => match &stmt.alternative {
            Some(alternative) => {
                stmt.resolution.statements.iter().any(always_returns)
                    && alternative.statements.iter().any(always_returns)
            },
            None => false
        },
        _ => false
    }
}

fn contains_return(statements: &[Statement]) -> bool {
    statements.iter().any(|statement| match statement {
        Statement::Return(_) => true,
        Statement::Block(block) => contains_return(&block.statements),
        Statement::If(stmt) => {
            contains_return(&stmt.resolution.statements)
                || stmt.alternative.as_ref().is_some_and(|alt| contains_return(&alt.statements))
        },
        Statement::While(stmt) => contains_return(&stmt.body.statements),
        _ => false
    })
}
