use std::io::Write;

use crate::{
    environment::prelude::{Function, FunctionTable, Scope, Value, ValueType},
    parser::prelude::{
        BinaryExpr, BinaryOperator, Block, Call, Expression, Program, Statement,
        UnaryOperator, BUILTIN_PRINT
    },
    utils::prelude::SrcSpan
};
use super::error::EvalError;

pub const ENTRY_POINT: &str = "main";
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

const BASE_STACK_SIZE: usize = 16 * 1024 * 1024;
const FRAME_STACK_SIZE: usize = 64 * 1024;

const ZERO: Value = Value::Integer { value: 0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of live user function frames, `main` included.
    pub max_call_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

impl Options {
    /// Host stack needed to reach `max_call_depth` nested calls.
    pub fn stack_size(&self) -> usize {
        self.max_call_depth
            .saturating_mul(FRAME_STACK_SIZE)
            .saturating_add(BASE_STACK_SIZE)
    }
}

/// Outcome of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub(crate) struct Interpreter<'p, W: Write> {
    program: &'p Program,
    functions: FunctionTable<'p>,
    out: W,
    options: Options,
    depth: usize,
}

impl<'p, W: Write> Interpreter<'p, W> {
    pub(crate) fn new(program: &'p Program, out: W, options: Options) -> Result<Self, EvalError> {
        Ok(Self {
            program,
            functions: FunctionTable::register(program)?,
            out,
            options,
            depth: 0,
        })
    }

    pub(crate) fn run(&mut self) -> Result<i32, EvalError> {
        let main = self.functions.resolve(ENTRY_POINT, self.program.location)?;

        if main.arity() != 0 {
            return Err(EvalError::ArityMismatch {
                name: ENTRY_POINT.to_string(),
                expected: 0,
                got: main.arity(),
                location: main.name.location
            });
        }

        let globals = Scope::global();
        let result = self.invoke(main, vec![], main.location, &globals)?;

        self.out.flush().map_err(|err| EvalError::Output { err: err.kind() })?;

        match result {
            Value::Integer { value } => Ok(value),
            other => Err(EvalError::TypeMismatch {
                expected: "int",
                got: other.value_type(),
                location: main.name.location
            })
        }
    }

    fn invoke(
        &mut self,
        function: Function<'p>,
        arguments: Vec<Value>,
        location: SrcSpan,
        scope: &Scope<'_>
    ) -> Result<Value, EvalError> {
        if self.depth >= self.options.max_call_depth {
            return Err(EvalError::StackOverflow {
                limit: self.options.max_call_depth,
                location
            });
        }

        let frame = Scope::child(scope.global_scope());

        for (parameter, value) in function.parameters.iter().zip(arguments) {
            frame.declare(&parameter.value, value, parameter.location)?;
        }

        self.depth += 1;
        let flow = self.exec_statements(&function.body.statements, &frame);
        self.depth -= 1;

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(ZERO)
        }
    }

    fn exec_block(&mut self, block: &Block, scope: &Scope<'_>) -> Result<Flow, EvalError> {
        let inner = Scope::child(scope);

        self.exec_statements(&block.statements, &inner)
    }

    fn exec_statements(&mut self, statements: &[Statement], scope: &Scope<'_>) -> Result<Flow, EvalError> {
        for statement in statements {
            if let Flow::Return(value) = self.exec_statement(statement, scope)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    fn exec_statement(&mut self, statement: &Statement, scope: &Scope<'_>) -> Result<Flow, EvalError> {
        match statement {
            Statement::VarDecl(decl) => {
                let value = match &decl.value {
                    Some(value) => self.eval_storable(value, scope)?,
                    None => ZERO
                };

                scope.declare(&decl.name.value, value, decl.name.location)?;
            },
            Statement::Assignment(assignment) => {
                let value = self.eval_storable(&assignment.value, scope)?;

                scope.assign(&assignment.name.value, value, assignment.name.location)?;
            },
            Statement::Expression(expression) => {
                let _ = self.eval_expression(expression, scope)?;
            },
            Statement::If(stmt) => {
                if self.eval_condition(&stmt.condition, scope)? {
                    return self.exec_block(&stmt.resolution, scope);
                }

                if let Some(alternative) = &stmt.alternative {
                    return self.exec_block(alternative, scope);
                }
            },
            Statement::While(stmt) => {
                while self.eval_condition(&stmt.condition, scope)? {
                    if let Flow::Return(value) = self.exec_block(&stmt.body, scope)? {
                        return Ok(Flow::Return(value));
                    }
                }
            },
            Statement::Return(stmt) => {
                let value = match &stmt.value {
                    Some(value) => self.eval_storable(value, scope)?,
                    None => ZERO
                };

                return Ok(Flow::Return(value));
            },
            Statement::Print(print) => {
                let _ = self.eval_print(&print.arguments, print.location, scope)?;
            },
            Statement::Block(block) => return self.exec_block(block, scope)
        }

        Ok(Flow::Normal)
    }

    fn eval_expression(&mut self, expression: &Expression, scope: &Scope<'_>) -> Result<Value, EvalError> {
        match expression {
            // Literals are range checked by the lexer; 2147483648 wraps to i32::MIN.
            Expression::Int(int) => Ok(Value::Integer { value: int.value as i32 }),
            Expression::String(string) => Ok(Value::String { value: string.value.clone() }),
            Expression::Identifier(ident) => Ok(scope.lookup(&ident.value, ident.location)?),
            Expression::Unary(unary) => {
                let operand = self.eval_expression(&unary.operand, scope)?;

                match (unary.operator, operand) {
                    (UnaryOperator::Negate, Value::Integer { value }) => {
                        Ok(Value::Integer { value: value.wrapping_neg() })
                    },
                    (UnaryOperator::Negate, other) => Err(EvalError::TypeMismatch {
                        expected: "int",
                        got: other.value_type(),
                        location: unary.operand.location()
                    })
                }
            },
            Expression::Binary(binary) => {
                let left = self.eval_expression(&binary.left, scope)?;
                let right = self.eval_expression(&binary.right, scope)?;

                apply_binary(binary, left, right)
            },
            Expression::Call(call) => self.eval_call(call, scope)
        }
    }

    fn eval_call(&mut self, call: &Call, scope: &Scope<'_>) -> Result<Value, EvalError> {
        if call.callee.value == BUILTIN_PRINT {
            return self.eval_print(&call.arguments, call.location, scope);
        }

        let function = self.functions.resolve(&call.callee.value, call.callee.location)?;

        // Nothing is evaluated when the call is malformed.
        if function.arity() != call.arguments.len() {
            return Err(EvalError::ArityMismatch {
                name: call.callee.value.clone(),
                expected: function.arity(),
                got: call.arguments.len(),
                location: call.location
            });
        }

        let arguments = call.arguments.iter()
            .map(|argument| self.eval_storable(argument, scope))
            .collect::<Result<Vec<Value>, EvalError>>()?;

        self.invoke(function, arguments, call.location, scope)
    }

    fn eval_print(
        &mut self,
        arguments: &[Expression],
        location: SrcSpan,
        scope: &Scope<'_>
    ) -> Result<Value, EvalError> {
        let [argument] = arguments else {
            return Err(EvalError::ArityMismatch {
                name: BUILTIN_PRINT.to_string(),
                expected: 1,
                got: arguments.len(),
                location
            });
        };

        let value = self.eval_storable(argument, scope)?;

        writeln!(self.out, "{value}").map_err(|err| EvalError::Output { err: err.kind() })?;

        Ok(Value::Void)
    }

    fn eval_condition(&mut self, condition: &Expression, scope: &Scope<'_>) -> Result<bool, EvalError> {
        match self.eval_expression(condition, scope)? {
            Value::Integer { value } => Ok(value != 0),
            other => Err(EvalError::TypeMismatch {
                expected: "int",
                got: other.value_type(),
                location: condition.location()
            })
        }
    }

    /// Evaluates a value that is about to be bound, passed or printed.
    fn eval_storable(&mut self, expression: &Expression, scope: &Scope<'_>) -> Result<Value, EvalError> {
        match self.eval_expression(expression, scope)? {
            Value::Void => Err(EvalError::TypeMismatch {
                expected: "int or string",
                got: ValueType::Void,
                location: expression.location()
            }),
            value => Ok(value)
        }
    }
}

fn apply_binary(binary: &BinaryExpr, left: Value, right: Value) -> Result<Value, EvalError> {
    let operator = binary.operator;

    match (left, right) {
        (Value::Integer { value: l }, Value::Integer { value: r }) => {
            let value = match operator {
                BinaryOperator::Add => l.wrapping_add(r),
                BinaryOperator::Sub => l.wrapping_sub(r),
                BinaryOperator::Mul => l.wrapping_mul(r),
                BinaryOperator::Div => {
                    if r == 0 {
                        return Err(EvalError::DivisionByZero { location: binary.location });
                    }

                    l.wrapping_div(r)
                },
                BinaryOperator::Eq => (l == r) as i32,
                BinaryOperator::Ne => (l != r) as i32,
                BinaryOperator::Lt => (l < r) as i32,
                BinaryOperator::Le => (l <= r) as i32,
                BinaryOperator::Gt => (l > r) as i32,
                BinaryOperator::Ge => (l >= r) as i32,
            };

            Ok(Value::Integer { value })
        },
        (Value::String { value: l }, Value::String { value: r })
            if matches!(operator, BinaryOperator::Eq | BinaryOperator::Ne) =>
        {
            Ok(Value::from((l == r) == (operator == BinaryOperator::Eq)))
        },
        (Value::Integer { .. }, other) => Err(EvalError::TypeMismatch {
            expected: "int",
            got: other.value_type(),
            location: binary.right.location()
        }),
        (Value::String { .. }, other) if matches!(operator, BinaryOperator::Eq | BinaryOperator::Ne) => {
            Err(EvalError::TypeMismatch {
                expected: "string",
                got: other.value_type(),
                location: binary.right.location()
            })
        },
        (other, _) => Err(EvalError::TypeMismatch {
            expected: "int",
            got: other.value_type(),
            location: binary.left.location()
        })
    }
}
