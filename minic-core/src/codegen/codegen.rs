use crate::parser::prelude::{
    Block, Call, Expression, FunctionDecl, Program, Statement, UnaryOperator, BUILTIN_PRINT
};
use super::instruction::{Instruction, Operand};

/// Lowers a checked program to three-address code. Locals keep their source
/// names, so shadowed variables share one name in the listing.
#[derive(Debug, Default)]
pub struct Codegen {
    code: Vec<Instruction>,
    temp_count: usize,
    label_count: usize,
}

impl Codegen {
    pub fn generate(program: &Program) -> Vec<Instruction> {
        let mut codegen = Codegen::default();

        for function in &program.functions {
            codegen.compile_function(function);
        }

        codegen.code
    }

    fn new_temp(&mut self) -> Operand {
        self.temp_count += 1;
        Operand::Temp(self.temp_count)
    }

    fn new_label(&mut self, base: &str) -> String {
        self.label_count += 1;
        format!("{base}{}", self.label_count)
    }

    fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction)
    }

    fn compile_function(&mut self, function: &FunctionDecl) {
        let name = function.name.value.clone();

        self.emit(Instruction::Func { name: name.clone() });

        for parameter in &function.parameters {
            self.emit(Instruction::ParamDecl { name: parameter.value.clone() });
        }

        self.compile_block(&function.body);
        self.emit(Instruction::EndFunc { name });
    }

    fn compile_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.compile_stmt(statement);
        }
    }

    fn compile_stmt(&mut self, statement: &Statement) {
        match statement {
            Statement::VarDecl(decl) => {
                let src = match &decl.value {
                    Some(value) => self.compile_expression(value),
                    None => Operand::Int(0)
                };

                self.emit(Instruction::Move { dest: Operand::Name(decl.name.value.clone()), src });
            },
            Statement::Assignment(assignment) => {
                let src = self.compile_expression(&assignment.value);

                self.emit(Instruction::Move { dest: Operand::Name(assignment.name.value.clone()), src });
            },
            Statement::Expression(expression) => {
                self.compile_expression(expression);
            },
            Statement::If(stmt) => {
                let condition = self.compile_expression(&stmt.condition);
                let else_label = self.new_label("ELSE");
                let end_label = self.new_label("ENDIF");

                self.emit(Instruction::IfZero { condition, label: else_label.clone() });
                self.compile_block(&stmt.resolution);
                self.emit(Instruction::Goto { label: end_label.clone() });
                self.emit(Instruction::Label { label: else_label });

                if let Some(alternative) = &stmt.alternative {
                    self.compile_block(alternative);
                }

                self.emit(Instruction::Label { label: end_label });
            },
            Statement::While(stmt) => {
                let start_label = self.new_label("WHILE_START");
                let end_label = self.new_label("WHILE_END");

                self.emit(Instruction::Label { label: start_label.clone() });
                let condition = self.compile_expression(&stmt.condition);
                self.emit(Instruction::IfZero { condition, label: end_label.clone() });
                self.compile_block(&stmt.body);
                self.emit(Instruction::Goto { label: start_label });
                self.emit(Instruction::Label { label: end_label });
            },
            Statement::Return(stmt) => {
                let value = stmt.value.as_ref().map(|value| self.compile_expression(value));

                self.emit(Instruction::Return { value });
            },
            Statement::Print(print) => self.compile_print(&print.arguments),
            Statement::Block(block) => self.compile_block(block)
        }
    }

    fn compile_print(&mut self, arguments: &[Expression]) {
        for argument in arguments {
            let value = self.compile_expression(argument);
            self.emit(Instruction::Print { value });
        }
    }

    fn compile_expression(&mut self, expression: &Expression) -> Operand {
        match expression {
            Expression::Int(int) => {
                let dest = self.new_temp();
                self.emit(Instruction::Move { dest: dest.clone(), src: Operand::Int(int.value) });

                dest
            },
            Expression::String(string) => {
                let dest = self.new_temp();
                self.emit(Instruction::Move { dest: dest.clone(), src: Operand::Str(string.value.clone()) });

                dest
            },
            Expression::Identifier(ident) => Operand::Name(ident.value.clone()),
            Expression::Binary(binary) => {
                let left = self.compile_expression(&binary.left);
                let right = self.compile_expression(&binary.right);
                let dest = self.new_temp();

                self.emit(Instruction::Binary {
                    operator: binary.operator,
                    dest: dest.clone(),
                    left,
                    right
                });

                dest
            },
            Expression::Unary(unary) => {
                let operand = self.compile_expression(&unary.operand);
                let dest = self.new_temp();

                match unary.operator {
                    UnaryOperator::Negate => self.emit(Instruction::Negate { dest: dest.clone(), operand })
                }

                dest
            },
            Expression::Call(call) => self.compile_call(call)
        }
    }

    fn compile_call(&mut self, call: &Call) -> Operand {
        // `print` produces no value; the placeholder is never read by a
        // program that runs.
        if call.callee.value == BUILTIN_PRINT {
            self.compile_print(&call.arguments);
            return Operand::Int(0);
        }

        for argument in &call.arguments {
            let value = self.compile_expression(argument);
            self.emit(Instruction::Param { value });
        }

        self.emit(Instruction::Call {
            function: call.callee.value.clone(),
            arguments: call.arguments.len()
        });

        let dest = self.new_temp();
        self.emit(Instruction::Pop { dest: dest.clone() });

        dest
    }
}
