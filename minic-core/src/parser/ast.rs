use std::fmt::Display;

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{InfixParse, Parse, ParseError, Parser, Precedence},
    utils::prelude::SrcSpan
};

/// Name of the only built-in function.
pub const BUILTIN_PRINT: &str = "print";

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub program: Program
}

// program -> { <function> } EOF
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<FunctionDecl>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Program {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let start = parser.current_start();
        let mut functions = vec![];

        loop {
            match &parser.current_token {
                Some((_, Token::Eof, end)) => {
                    let end = *end;

                    return Ok(Self {
                        functions,
                        location: SrcSpan { start, end }
                    })
                },
                Some(_) => functions.push(FunctionDecl::parse(parser, None)?),
                None => return Err(parser.unexpected(vec!["`int`".into()]))
            }
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let functions = self.functions.iter()
            .map(|function| function.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", functions.join("\n"))
    }
}

// function -> int <ident> ( [ int <ident> { , int <ident> } ] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for FunctionDecl {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_type()?;
        let name = Identifier::parse(parser, None)?;

        parser.expect_one(Token::LParen)?;

        let mut parameters = vec![];
        if !parser.is_current(&Token::RParen) {
            loop {
                parser.expect_type()?;
                parameters.push(Identifier::parse(parser, None)?);

                if !parser.is_current(&Token::Comma) {
                    break;
                }
                parser.step();
            }
        }

        parser.expect_one(Token::RParen)?;

        let body = Block::parse(parser, None)?;
        let location = SrcSpan { start, end: body.location.end };

        Ok(Self { name, parameters, body, location })
    }
}

impl Display for FunctionDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self.parameters.iter()
            .map(|parameter| format!("int {parameter}"))
            .collect::<Vec<String>>();

        write!(f, "int {}({}) {}", self.name, parameters.join(", "), self.body)
    }
}

// block -> { { <statement> } }
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Block {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        parser.nested(|parser| {
            let (start, _) = parser.expect_one(Token::LBrace)?;
            let mut statements = vec![];

            loop {
                match &parser.current_token {
                    Some((_, Token::RBrace, _)) => break,
                    Some((_, Token::Eof, _)) | None => {
                        return Err(parser.unexpected(vec!["`}`".into()]))
                    },
                    Some(_) => statements.push(Statement::parse(parser, None)?)
                }
            }

            let (_, end) = parser.expect_one(Token::RBrace)?;

            Ok(Self {
                statements,
                location: SrcSpan { start, end }
            })
        })
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }

        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{{ {} }}", statements.join(" "))
    }
}

// statement -> <var_decl> | <assignment> | <expression> ; | <if> | <while>
//            | <return> | <print> | <block>
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VarDecl(VarDecl),
    Assignment(Assignment),
    Expression(Expression),
    If(If),
    While(While),
    Return(Return),
    Print(PrintStmt),
    Block(Block),
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Statement::VarDecl(stmt) => stmt.location,
            Statement::Assignment(stmt) => stmt.location,
            Statement::Expression(expr) => expr.location(),
            Statement::If(stmt) => stmt.location,
            Statement::While(stmt) => stmt.location,
            Statement::Return(stmt) => stmt.location,
            Statement::Print(stmt) => stmt.location,
            Statement::Block(block) => block.location,
        }
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        Ok(match &parser.current_token {
            Some((_, Token::IntType, _)) => Statement::VarDecl(VarDecl::parse(parser, None)?),
            Some((_, Token::Return, _)) => Statement::Return(Return::parse(parser, None)?),
            Some((_, Token::If, _)) => Statement::If(If::parse(parser, None)?),
            Some((_, Token::While, _)) => Statement::While(While::parse(parser, None)?),
            Some((_, Token::LBrace, _)) => Statement::Block(Block::parse(parser, None)?),
            Some((_, Token::Ident(name), _))
                if name == BUILTIN_PRINT && parser.is_next(&Token::LParen) =>
            {
                Statement::Print(PrintStmt::parse(parser, None)?)
            },
            Some((_, Token::Ident(_), _)) if parser.is_next(&Token::Assign) => {
                Statement::Assignment(Assignment::parse(parser, None)?)
            },
            Some((_, Token::Eof, _)) | None => return Err(parser.unexpected(vec![])),
            Some(_) => {
                let expression = Expression::parse(parser, None)?;
                parser.expect_one(Token::Semicolon)?;

                Statement::Expression(expression)
            }
        })
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::VarDecl(stmt) => write!(f, "{stmt}"),
            Statement::Assignment(stmt) => write!(f, "{stmt}"),
            Statement::Expression(expr) => write!(f, "{expr};"),
            Statement::If(stmt) => write!(f, "{stmt}"),
            Statement::While(stmt) => write!(f, "{stmt}"),
            Statement::Return(stmt) => write!(f, "{stmt}"),
            Statement::Print(stmt) => write!(f, "{stmt}"),
            Statement::Block(block) => write!(f, "{block}"),
        }
    }
}

// var_decl -> int <ident> [ = <expression> ] ;
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Identifier,
    pub value: Option<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for VarDecl {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_type()?;
        let name = Identifier::parse(parser, None)?;

        let value = if parser.is_current(&Token::Assign) {
            parser.step();
            Some(Expression::parse(parser, None)?)
        } else {
            None
        };

        let (_, end) = match parser.expect_one(Token::Semicolon) {
            Ok(span) => span,
            Err(_) if value.is_none() => {
                return Err(parser.unexpected(vec!["`=`".into(), "`;`".into()]))
            },
            Err(err) => return Err(err)
        };

        Ok(Self {
            name,
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for VarDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "int {} = {};", self.name, value),
            None => write!(f, "int {};", self.name)
        }
    }
}

// assignment -> <ident> = <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: Identifier,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Assignment {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let name = Identifier::parse(parser, None)?;
        parser.expect_one(Token::Assign)?;

        let value = Expression::parse(parser, None)?;
        let (_, end) = parser.expect_one(Token::Semicolon)?;
        let location = SrcSpan { start: name.location.start, end };

        Ok(Self { name, value, location })
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {};", self.name, self.value)
    }
}

// if -> if ( <expression> ) <block> [ else ( <block> | <if> ) ]
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub resolution: Block,
    /// `else if` chains are stored as a block holding a single `if`
    /// that spans the whole block.
    pub alternative: Option<Block>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for If {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        parser.expect_one(Token::LParen)?;
        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::RParen)?;

        let resolution = Block::parse(parser, None)?;

        let alternative = if parser.is_current(&Token::Else) {
            parser.step();

            if parser.is_current(&Token::If) {
                let nested = If::parse(parser, None)?;
                let location = nested.location;

                Some(Block {
                    statements: vec![Statement::If(nested)],
                    location
                })
            } else {
                Some(Block::parse(parser, None)?)
            }
        } else {
            None
        };

        let end = alternative.as_ref()
            .map(|block| block.location.end)
            .unwrap_or(resolution.location.end);

        Ok(Self {
            condition,
            resolution,
            alternative,
            location: SrcSpan { start, end }
        })
    }
}

impl If {
    /// The nested `if` of an `else if`, if this is one.
    pub fn else_if(&self) -> Option<&If> {
        let alternative = self.alternative.as_ref()?;

        match alternative.statements.as_slice() {
            [Statement::If(nested)] if nested.location == alternative.location => Some(nested),
            _ => None
        }
    }
}

impl Display for If {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.resolution)?;

        if let Some(nested) = self.else_if() {
            return write!(f, " else {nested}");
        }

        match &self.alternative {
            Some(alternative) => write!(f, " else {alternative}"),
            None => Ok(())
        }
    }
}

// while -> while ( <expression> ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Expression,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for While {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::While)?;

        parser.expect_one(Token::LParen)?;
        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::RParen)?;

        let body = Block::parse(parser, None)?;
        let location = SrcSpan { start, end: body.location.end };

        Ok(Self { condition, body, location })
    }
}

impl Display for While {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "while ({}) {}", self.condition, self.body)
    }
}

// return -> return [ <expression> ] ;
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Return {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Return)?;

        let value = if parser.is_current(&Token::Semicolon) {
            None
        } else {
            Some(Expression::parse(parser, None)?)
        };

        let (_, end) = parser.expect_one(Token::Semicolon)?;

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {value};"),
            None => write!(f, "return;")
        }
    }
}

// print -> print ( [ <expression> { , <expression> } ] ) ;
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for PrintStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let callee = Identifier::parse(parser, None)?;
        let (arguments, _) = parse_arguments(parser)?;
        let (_, end) = parser.expect_one(Token::Semicolon)?;

        Ok(Self {
            arguments,
            location: SrcSpan { start: callee.location.start, end }
        })
    }
}

impl Display for PrintStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{BUILTIN_PRINT}({});", join_arguments(&self.arguments))
    }
}

// expression -> <int> | <string> | <ident> | <call> | - <expression>
//             | ( <expression> ) | <expression> <binary_op> <expression>
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Int(IntLiteral),
    String(StringLiteral),
    Identifier(Identifier),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(Call),
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Expression::Int(int) => int.location,
            Expression::String(string) => string.location,
            Expression::Identifier(ident) => ident.location,
            Expression::Binary(expr) => expr.location,
            Expression::Unary(expr) => expr.location,
            Expression::Call(call) => call.location,
        }
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = precedence.unwrap_or(Precedence::Lowest);

        parser.nested(|parser| {
            let mut left = match &parser.current_token {
                Some((_, Token::Int(_), _)) => Expression::Int(IntLiteral::parse(parser, None)?),
                Some((_, Token::String(_), _)) => Expression::String(StringLiteral::parse(parser, None)?),
                Some((_, Token::Ident(_), _)) if parser.is_next(&Token::LParen) => {
                    Expression::Call(Call::parse(parser, None)?)
                },
                Some((_, Token::Ident(_), _)) => Expression::Identifier(Identifier::parse(parser, None)?),
                Some((_, Token::Minus, _)) => Expression::Unary(UnaryExpr::parse(parser, None)?),
                Some((_, Token::LParen, _)) => {
                    parser.step();
                    let inner = Expression::parse(parser, None)?;
                    parser.expect_one(Token::RParen)?;

                    inner
                },
                _ => return Err(parser.expected_expression())
            };

            while precedence < parser.current_precedence() {
                left = Expression::Binary(BinaryExpr::parse(parser, left, None)?);
            }

            Ok(left)
        })
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Int(int) => write!(f, "{int}"),
            Expression::String(string) => write!(f, "{string}"),
            Expression::Identifier(ident) => write!(f, "{ident}"),
            Expression::Binary(expr) => write!(f, "{expr}"),
            Expression::Unary(expr) => write!(f, "{expr}"),
            Expression::Call(call) => write!(f, "{call}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOperator {
    pub fn from_token(token: &Token) -> Option<Self> {
        Some(match token {
            Token::Plus => Self::Add,
            Token::Minus => Self::Sub,
            Token::Mult => Self::Mul,
            Token::Div => Self::Div,
            Token::Equal => Self::Eq,
            Token::NotEqual => Self::Ne,
            Token::LessThan => Self::Lt,
            Token::LessThanOrEqual => Self::Le,
            Token::GreaterThan => Self::Gt,
            Token::GreaterThanOrEqual => Self::Ge,
            _ => return None
        })
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for BinaryExpr {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (operator, precedence) = match &parser.current_token {
            Some((_, token, _)) => match BinaryOperator::from_token(token) {
                Some(operator) => (operator, Precedence::from(token)),
                None => return Err(parser.unexpected(vec!["an operator".into()]))
            },
            None => return Err(parser.unexpected(vec!["an operator".into()]))
        };
        parser.step();

        let right = Expression::parse(parser, Some(precedence))?;
        let location = left.location().merge(right.location());

        Ok(Self {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            location
        })
    }
}

impl Display for BinaryExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for UnaryExpr {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Minus)?;
        let operand = Expression::parse(parser, Some(Precedence::Prefix))?;
        let location = SrcSpan { start, end: operand.location().end };

        Ok(Self {
            operator: UnaryOperator::Negate,
            operand: Box::new(operand),
            location
        })
    }
}

impl Display for UnaryExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.operator {
            UnaryOperator::Negate => write!(f, "-{}", self.operand)
        }
    }
}

// call -> <ident> ( [ <expression> { , <expression> } ] )
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Identifier,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let callee = Identifier::parse(parser, None)?;
        let (arguments, end) = parse_arguments(parser)?;
        let location = SrcSpan { start: callee.location.start, end };

        Ok(Self { callee, arguments, location })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.callee, join_arguments(&self.arguments))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Identifier {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, value, end) = parser.expect_ident()?;

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Integer literal as written. The value is not yet narrowed to `int`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub value: i64,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for IntLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match &parser.current_token {
            Some((start, Token::Int(value), end)) => {
                let literal = Self {
                    value: *value,
                    location: SrcSpan::from(*start, *end)
                };
                parser.step();

                Ok(literal)
            },
            _ => Err(parser.expected_expression())
        }
    }
}

impl Display for IntLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for StringLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match parser.current_token.take() {
            Some((start, Token::String(value), end)) => {
                parser.step();

                Ok(Self {
                    value,
                    location: SrcSpan { start, end }
                })
            },
            other => {
                parser.current_token = other;

                Err(parser.expected_expression())
            }
        }
    }
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

fn parse_arguments<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>
) -> Result<(Vec<Expression>, u32), ParseError> {
    parser.expect_one(Token::LParen)?;

    let mut arguments = vec![];
    if !parser.is_current(&Token::RParen) {
        loop {
            arguments.push(Expression::parse(parser, None)?);

            if !parser.is_current(&Token::Comma) {
                break;
            }
            parser.step();
        }
    }

    let (_, end) = parser.expect_one(Token::RParen)?;

    Ok((arguments, end))
}

fn join_arguments(arguments: &[Expression]) -> String {
    arguments.iter()
        .map(|argument| argument.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}
