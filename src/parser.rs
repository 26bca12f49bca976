use std::collections::HashSet;

use crate::error::{Reportable, SyntaxError};
use crate::expr::*;
use crate::stmt::*;
use crate::token::{Location, Token, Type};

type ParseResult<T> = Result<T, SyntaxError>;

/// Returns true if the next token is any of the given types, consuming it.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) )||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Precedence levels, lowest to highest. Declaration order is load-bearing:
/// the derived `PartialOrd` compares variants by position, which is exactly
/// the ladder the Pratt loop needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Assign,
    LogicalOr,
    LogicalAnd,
    Equals,
    Compare,
    Sum,
    Product,
    Prefix,
    Call,
}

fn precedence_of(r#type: Type) -> Precedence {
    match r#type {
        Type::Assign => Precedence::Assign,
        Type::Or => Precedence::LogicalOr,
        Type::And => Precedence::LogicalAnd,
        Type::Equal | Type::NotEqual => Precedence::Equals,
        Type::Less | Type::Greater | Type::LessEqual | Type::GreaterEqual => Precedence::Compare,
        Type::Plus | Type::Minus => Precedence::Sum,
        Type::Star | Type::Slash | Type::SlashSlash | Type::Percent => Precedence::Product,
        Type::LeftParen | Type::LeftBracket | Type::Dot => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// A Pratt expression parser driving a small registry of statement forms.
/// Compound-assignment (`+= -= ...`) and bitwise (`& | ^ ~ << >>`) operator
/// tokens are recognized by the scanner per the token contract but have no
/// production here — the grammar never wires them into an expression, so
/// they are reserved tokens rather than live operators.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    loop_depth: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, loop_depth: 0 }
    }

    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => {
                    error.throw();
                    self.synchronize();
                }
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::EOF
    }

    fn check(&self, r#type: Type) -> bool {
        !self.is_at_end() && self.peek().r#type == r#type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn expect(&mut self, r#type: Type, message: &str) -> ParseResult<Token> {
        if self.check(r#type) {
            return Ok(self.advance().clone());
        }

        Err(SyntaxError { location: self.peek().location, message: message.to_string() })
    }

    // ---- statements --------------------------------------------------

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().r#type {
            Type::Let => self.let_statement(),
            Type::Const => self.const_statement(),
            Type::Return => self.return_statement(),
            Type::While => self.while_statement(),
            Type::For => self.for_statement(),
            Type::Break => self.break_statement(),
            Type::Continue => self.continue_statement(),
            Type::Class => self.class_statement(),
            Type::LeftBrace => self.block_as_statement(),
            _ => self.expression_statement(),
        }
    }

    fn let_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.advance().clone();
        let name = self.expect(Type::Identifier, "Expect variable name")?;
        self.expect(Type::Assign, "Expect '=' after variable name")?;
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect(Type::Semicolon, "Expect ';' after variable declaration")?;
        Ok(Stmt::Let(LetData { token, name, value }))
    }

    fn const_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.advance().clone();
        let name = self.expect(Type::Identifier, "Expect constant name")?;
        self.expect(Type::Assign, "Expect '=' after constant name")?;
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect(Type::Semicolon, "Expect ';' after constant declaration")?;
        Ok(Stmt::Const(ConstData { token, name, value }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.advance().clone();
        let value = if self.check(Type::Semicolon) {
            None
        } else {
            Some(self.parse_expression(Precedence::Lowest)?)
        };
        self.expect(Type::Semicolon, "Expect ';' after return value")?;
        Ok(Stmt::Return(ReturnData { token, value }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.advance().clone();
        self.expect(Type::LeftParen, "Expect '(' after 'while'")?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect(Type::RightParen, "Expect ')' after condition")?;

        self.loop_depth += 1;
        self.expect(Type::LeftBrace, "Expect '{' before while body")?;
        let body = self.block_statements()?;
        self.loop_depth -= 1;

        Ok(Stmt::While(WhileData { token, condition, body }))
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.advance().clone();
        self.expect(Type::LeftParen, "Expect '(' after 'for'")?;

        if !self.check(Type::Let) {
            return Err(SyntaxError { location: self.peek().location, message: "Expect 'let' in for-loop initializer".to_string() });
        }
        let init = Box::new(self.let_statement()?);

        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect(Type::Semicolon, "Expect ';' after loop condition")?;

        let update = self.parse_expression(Precedence::Lowest)?;
        self.expect(Type::RightParen, "Expect ')' after for clauses")?;

        self.loop_depth += 1;
        self.expect(Type::LeftBrace, "Expect '{' before for body")?;
        let body = self.block_statements()?;
        self.loop_depth -= 1;

        Ok(Stmt::For(ForData { token, init, condition, update, body }))
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.advance().clone();
        if self.loop_depth == 0 {
            return Err(SyntaxError { location: token.location, message: "'break' outside of a loop".to_string() });
        }
        self.expect(Type::Semicolon, "Expect ';' after 'break'")?;
        Ok(Stmt::Break(BreakData { token }))
    }

    fn continue_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.advance().clone();
        if self.loop_depth == 0 {
            return Err(SyntaxError { location: token.location, message: "'continue' outside of a loop".to_string() });
        }
        self.expect(Type::Semicolon, "Expect ';' after 'continue'")?;
        Ok(Stmt::Continue(ContinueData { token }))
    }

    fn class_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.advance().clone();
        let name = self.expect(Type::Identifier, "Expect class name")?;

        let parent = if matches!(self, Type::Extends) {
            Some(self.expect(Type::Identifier, "Expect superclass name")?)
        } else {
            None
        };

        self.expect(Type::LeftBrace, "Expect '{' before class body")?;

        let mut constructor: Option<MethodDef> = None;
        let mut methods = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            let method = self.method_def()?;

            if method.name.lexeme == "constructor" {
                if constructor.is_some() {
                    return Err(SyntaxError { location: method.name.location, message: "class may have only one constructor".to_string() });
                }
                constructor = Some(method);
                continue;
            }

            if !seen.insert(method.name.lexeme.clone()) {
                return Err(SyntaxError {
                    location: method.name.location,
                    message: format!("duplicate method name '{}' in class body", method.name.lexeme),
                });
            }
            methods.push(method);
        }

        self.expect(Type::RightBrace, "Expect '}' after class body")?;

        Ok(Stmt::Class(ClassData { token, name, parent, constructor, methods }))
    }

    fn method_def(&mut self) -> ParseResult<MethodDef> {
        let name = self.expect(Type::Identifier, "Expect method name")?;
        self.expect(Type::LeftParen, "Expect '(' after method name")?;
        let params = self.parse_params()?;
        self.expect(Type::RightParen, "Expect ')' after parameters")?;
        self.expect(Type::LeftBrace, "Expect '{' before method body")?;

        // A method body starts a fresh loop-depth count: `break`/`continue`
        // inside it must be enclosed by a loop written inside this method,
        // never by a loop the method happens to be called from.
        let enclosing_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.block_statements()?;
        self.loop_depth = enclosing_loop_depth;

        Ok(MethodDef { name, params, body })
    }

    fn block_as_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.peek().clone();
        self.expect(Type::LeftBrace, "Expect '{'")?;
        let statements = self.block_statements()?;
        Ok(Stmt::Block(BlockData { token, statements }))
    }

    /// Parses statements up to (and consuming) the closing `}`. Assumes the
    /// opening `{` has already been consumed by the caller.
    fn block_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.expect(Type::RightBrace, "Expect '}' after block")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.peek().clone();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.check(Type::Semicolon) {
            self.advance();
        }

        Ok(Stmt::Expression(ExpressionData { token, expr }))
    }

    fn parse_params(&mut self) -> ParseResult<Vec<Token>> {
        let mut params = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                params.push(self.expect(Type::Identifier, "Expect parameter name")?);
                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        Ok(params)
    }

    fn parse_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                args.push(self.parse_expression(Precedence::Lowest)?);
                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        Ok(args)
    }

    // ---- expressions ---------------------------------------------------

    pub fn parse_expression(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while precedence_of(self.peek().r#type) > min_precedence {
            let operator = self.advance().clone();
            left = self.parse_infix(operator, left)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        match token.r#type {
            Type::Integer => {
                self.advance();
                let value = match token.literal { Some(crate::literal::Literal::Integer(n)) => n, _ => unreachable!() };
                Ok(Expr::Integer(IntegerData { token, value }))
            }
            Type::Float => {
                self.advance();
                let value = match token.literal { Some(crate::literal::Literal::Float(n)) => n, _ => unreachable!() };
                Ok(Expr::Float(FloatData { token, value }))
            }
            Type::String => {
                self.advance();
                let value = match token.literal.clone() { Some(crate::literal::Literal::String(s)) => s, _ => unreachable!() };
                Ok(Expr::Str(StringData { token, value }))
            }
            Type::True => { self.advance(); Ok(Expr::Boolean(BooleanData { token, value: true })) }
            Type::False => { self.advance(); Ok(Expr::Boolean(BooleanData { token, value: false })) }
            Type::Null => { self.advance(); Ok(Expr::Null(NullData { token })) }
            Type::Identifier => {
                self.advance();
                Ok(Expr::Identifier(IdentifierData { name: token.lexeme.clone(), token }))
            }
            Type::Minus | Type::Bang => {
                self.advance();
                let right = self.parse_expression(Precedence::Prefix)?;
                Ok(Expr::Prefix(PrefixData { token: token.clone(), operator: token, right: Box::new(right) }))
            }
            Type::LeftParen => {
                self.advance();
                let expr = self.parse_expression(Precedence::Lowest)?;
                self.expect(Type::RightParen, "Expect ')' after expression")?;
                Ok(expr)
            }
            Type::LeftBracket => self.array_literal(),
            Type::LeftBrace => self.hash_literal(),
            Type::Fn => self.function_literal(),
            Type::If => self.if_expression(),
            Type::This => { self.advance(); Ok(Expr::This(ThisData { token })) }
            Type::Super => self.super_expression(),
            Type::New => self.new_expression(),
            other => Err(SyntaxError { location: token.location, message: format!("no prefix parser for {other:?}") }),
        }
    }

    fn parse_infix(&mut self, operator: Token, left: Expr) -> ParseResult<Expr> {
        match operator.r#type {
            Type::Plus | Type::Minus | Type::Star | Type::Slash | Type::SlashSlash | Type::Percent
            | Type::Equal | Type::NotEqual
            | Type::Less | Type::Greater | Type::LessEqual | Type::GreaterEqual
            | Type::And | Type::Or => {
                let precedence = precedence_of(operator.r#type);
                let right = self.parse_expression(precedence)?;
                Ok(Expr::Infix(InfixData { token: operator.clone(), operator, left: Box::new(left), right: Box::new(right) }))
            }
            Type::Assign => {
                if !matches!(left, Expr::Identifier(_) | Expr::Property(_) | Expr::Index(_)) {
                    return Err(SyntaxError { location: operator.location, message: "Invalid assignment target".to_string() });
                }
                let value = self.parse_expression(Precedence::Lowest)?;
                Ok(Expr::Assignment(AssignmentData { token: operator, target: Box::new(left), value: Box::new(value) }))
            }
            Type::LeftParen => {
                let mut args = Vec::new();
                if !self.check(Type::RightParen) {
                    loop {
                        args.push(self.parse_expression(Precedence::Lowest)?);
                        if !matches!(self, Type::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Type::RightParen, "Expect ')' after arguments")?;
                Ok(Expr::Call(CallData { token: operator, callee: Box::new(left), args }))
            }
            Type::LeftBracket => {
                let index = self.parse_expression(Precedence::Lowest)?;
                self.expect(Type::RightBracket, "Expect ']' after index")?;
                Ok(Expr::Index(IndexData { token: operator, object: Box::new(left), index: Box::new(index) }))
            }
            Type::Dot => {
                let name = self.expect(Type::Identifier, "Expect property name after '.'")?;
                Ok(Expr::Property(PropertyData { token: operator, object: Box::new(left), name }))
            }
            other => unreachable!("no infix parser registered for {other:?}"),
        }
    }

    fn array_literal(&mut self) -> ParseResult<Expr> {
        let token = self.advance().clone();
        let mut elements = Vec::new();

        if !self.check(Type::RightBracket) {
            loop {
                elements.push(self.parse_expression(Precedence::Lowest)?);
                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.expect(Type::RightBracket, "Expect ']' after array elements")?;
        Ok(Expr::Array(ArrayData { token, elements }))
    }

    fn hash_literal(&mut self) -> ParseResult<Expr> {
        let token = self.advance().clone();
        let mut pairs = Vec::new();

        if !self.check(Type::RightBrace) {
            loop {
                let key = self.parse_expression(Precedence::Lowest)?;
                if !matches!(key, Expr::Str(_) | Expr::Integer(_)) {
                    return Err(SyntaxError { location: *key.token().location_ref(), message: "hash key must be a string or integer literal".to_string() });
                }
                self.expect(Type::Colon, "Expect ':' after hash key")?;
                let value = self.parse_expression(Precedence::Lowest)?;
                pairs.push((key, value));
                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.expect(Type::RightBrace, "Expect '}' after hash literal")?;
        Ok(Expr::Hash(HashData { token, pairs }))
    }

    fn function_literal(&mut self) -> ParseResult<Expr> {
        let token = self.advance().clone();
        self.expect(Type::LeftParen, "Expect '(' after 'fn'")?;
        let params = self.parse_params()?;
        self.expect(Type::RightParen, "Expect ')' after parameters")?;
        self.expect(Type::LeftBrace, "Expect '{' before function body")?;

        // See the matching comment in `method_def`: a function literal is
        // its own loop-depth scope, not an extension of whatever loop it
        // was written inside.
        let enclosing_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.block_statements()?;
        self.loop_depth = enclosing_loop_depth;

        Ok(Expr::Function(FunctionLiteralData { token, name: None, params, body }))
    }

    fn if_expression(&mut self) -> ParseResult<Expr> {
        let token = self.advance().clone();

        let mut branches = vec![self.if_branch()?];
        while matches!(self, Type::Elif) {
            branches.push(self.if_branch()?);
        }

        let else_body = if matches!(self, Type::Else) {
            self.expect(Type::LeftBrace, "Expect '{' before else body")?;
            Some(self.block_statements()?)
        } else {
            None
        };

        Ok(Expr::If(IfData { token, branches, else_body }))
    }

    fn if_branch(&mut self) -> ParseResult<IfBranch> {
        self.expect(Type::LeftParen, "Expect '(' after 'if'/'elif'")?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect(Type::RightParen, "Expect ')' after condition")?;
        self.expect(Type::LeftBrace, "Expect '{' before branch body")?;
        let body = self.block_statements()?;
        Ok(IfBranch { condition, body })
    }

    fn super_expression(&mut self) -> ParseResult<Expr> {
        let token = self.advance().clone();
        let method = if matches!(self, Type::Dot) {
            Some(self.expect(Type::Identifier, "Expect superclass method name")?)
        } else {
            None
        };
        Ok(Expr::Super(SuperData { token, method }))
    }

    fn new_expression(&mut self) -> ParseResult<Expr> {
        let token = self.advance().clone();
        let class_name = self.expect(Type::Identifier, "Expect class name after 'new'")?;
        self.expect(Type::LeftParen, "Expect '(' after class name")?;
        let args = self.parse_args()?;
        self.expect(Type::RightParen, "Expect ')' after arguments")?;
        Ok(Expr::New(NewData { token, class_name, args }))
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class | Type::Fn | Type::Let | Type::Const
                | Type::For | Type::If | Type::While | Type::Return => return,
                _ => { self.advance(); }
            }
        }
    }
}

impl Expr {
    fn location_ref(&self) -> &Location {
        &self.token().location
    }
}
