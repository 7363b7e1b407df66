use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{Result, ZyError};
use crate::lexer::{Keyword, Lexer, Operator, Token, TokenKind};
use std::rc::Rc;

/// Recursive-descent parser pulling tokens from the lexer one at a time.
///
/// Precedence, loosest first: `;`, `.`/`..`, `||`, `&&`, `=`/`!=`,
/// comparisons, `+`/`-`, `*`/`/`, prefix `!`/`-`, `::` assignment, calls,
/// atoms. Comparison, additive and multiplicative levels recurse into
/// themselves for the right operand, so `a - b - c` is `a - (b - c)`.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> Parser<'src> {
    pub fn new(mut lexer: Lexer<'src>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parses one complete program. A single trailing `end` is tolerated,
    /// so `if c then a else b end` works at the top level; anything else
    /// after the program is an error.
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.expression()?;
        if self.check_keyword(Keyword::End) {
            self.advance()?;
        }
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    pub fn expression(&mut self) -> Result<Expr> {
        let mut expr = self.compose_pipe()?;

        while self.check_operator(Operator::Semicolon) {
            self.advance()?;
            let position = expr.position();
            let second = self.expression()?;
            expr = Expr::Sequence {
                first: Box::new(expr),
                second: Box::new(second),
                position,
            };
        }

        Ok(expr)
    }

    fn compose_pipe(&mut self) -> Result<Expr> {
        let mut expr = self.or()?;

        while let Some(operator) = self.match_operators(&[Operator::Dot, Operator::DotDot])? {
            let right = self.or()?;
            expr = binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr> {
        let mut expr = self.and()?;

        while let Some(operator) = self.match_operators(&[Operator::OrOr])? {
            let right = self.and()?;
            expr = binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut expr = self.equality()?;

        while let Some(operator) = self.match_operators(&[Operator::AndAnd])? {
            let right = self.equality()?;
            expr = binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr = self.comparison()?;

        while let Some(operator) = self.match_operators(&[Operator::Equal, Operator::NotEqual])? {
            let right = self.comparison()?;
            expr = binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let expr = self.additive()?;

        let operators = [
            Operator::Less,
            Operator::Greater,
            Operator::LessEqual,
            Operator::GreaterEqual,
        ];
        match self.match_operators(&operators)? {
            Some(operator) => {
                let right = self.comparison()?;
                Ok(binary(operator, expr, right))
            }
            None => Ok(expr),
        }
    }

    fn additive(&mut self) -> Result<Expr> {
        let expr = self.multiplicative()?;

        match self.match_operators(&[Operator::Plus, Operator::Minus])? {
            Some(operator) => {
                let right = self.additive()?;
                Ok(binary(operator, expr, right))
            }
            None => Ok(expr),
        }
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let expr = self.unary()?;

        match self.match_operators(&[Operator::Star, Operator::Slash])? {
            Some(operator) => {
                let right = self.multiplicative()?;
                Ok(binary(operator, expr, right))
            }
            None => Ok(expr),
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        let operator = if self.check_operator(Operator::Bang) {
            UnaryOp::Not
        } else if self.check_operator(Operator::Minus) {
            UnaryOp::Negate
        } else {
            return self.assignment();
        };

        let position = self.advance()?.position;
        let operand = self.unary()?;
        Ok(Expr::Unary {
            operator,
            operand: Box::new(operand),
            position,
        })
    }

    /// `target :: value in body`. The target is not validated here; a
    /// non-variable target fails when evaluated.
    fn assignment(&mut self) -> Result<Expr> {
        let target = self.call()?;

        if !self.check(&TokenKind::DoubleColon) {
            return Ok(target);
        }
        self.advance()?;

        let value = self.expression()?;
        self.consume_keyword(Keyword::In)?;
        let next = self.expression()?;

        let position = target.position();
        Ok(Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
            next: Box::new(next),
            position,
        })
    }

    fn call(&mut self) -> Result<Expr> {
        let mut expr = self.atom()?;

        while self.check(&TokenKind::LeftParen) {
            let position = expr.position();
            let args = self.arguments()?;
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
                position,
            };
        }

        Ok(expr)
    }

    fn arguments(&mut self) -> Result<Vec<Expr>> {
        self.consume(TokenKind::LeftParen, "'('")?;
        let args = self.comma_separated(TokenKind::RightParen)?;
        self.consume(TokenKind::RightParen, "')'")
            .map_err(|e| e.with_help("arguments are separated by ',' and closed with ')'"))?;
        Ok(args)
    }

    fn comma_separated(&mut self, closing: TokenKind) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        if self.check(&closing) {
            return Ok(items);
        }

        items.push(self.expression()?);
        while self.check(&TokenKind::Comma) {
            self.advance()?;
            items.push(self.expression()?);
        }
        Ok(items)
    }

    fn atom(&mut self) -> Result<Expr> {
        let position = self.current.position;

        match self.current.kind.clone() {
            TokenKind::Keyword(Keyword::Let) => self.let_binding(),
            TokenKind::Keyword(Keyword::Fn) => self.function_def(),
            TokenKind::Keyword(Keyword::If) => self.if_expression(),
            TokenKind::Bool(value) => {
                self.advance()?;
                Ok(Expr::Bool { value, position })
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                Ok(Expr::Variable { name, position })
            }
            TokenKind::Number(value) => {
                self.advance()?;
                Ok(Expr::Number { value, position })
            }
            TokenKind::String(value) => {
                self.advance()?;
                Ok(Expr::String { value, position })
            }
            TokenKind::LeftParen => {
                self.advance()?;
                if self.check(&TokenKind::RightParen) {
                    self.advance()?;
                    return Ok(Expr::Nil { position });
                }
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LeftBracket => {
                self.advance()?;
                let items = self.comma_separated(TokenKind::RightBracket)?;
                self.consume(TokenKind::RightBracket, "']'")
                    .map_err(|e| e.with_help("list items are separated by ',' and closed with ']'"))?;
                Ok(Expr::List { items, position })
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn let_binding(&mut self) -> Result<Expr> {
        self.consume_keyword(Keyword::Let)?;
        let name = self.identifier()?;
        self.consume(TokenKind::DoubleColon, "'::'")
            .map_err(|e| e.with_help("bindings are written `let name :: value`"))?;
        let value = self.expression()?;
        let position = value.position();

        let body = if self.check_keyword(Keyword::In) {
            self.advance()?;
            self.expression()?
        } else {
            Expr::Nil { position }
        };
        let next = self.chained_declaration()?;

        Ok(Expr::LetBinding {
            name,
            value: Box::new(value),
            body: Box::new(body),
            next,
            position,
        })
    }

    fn function_def(&mut self) -> Result<Expr> {
        let position = self.consume_keyword(Keyword::Fn)?.position;

        let name = match &self.current.kind {
            TokenKind::Identifier(_) => Some(self.identifier()?),
            _ => None,
        };

        let mut params = Vec::new();
        if self.check(&TokenKind::LeftParen) {
            self.advance()?;
            if !self.check(&TokenKind::RightParen) {
                params.push(self.identifier()?);
                while self.check(&TokenKind::Comma) {
                    self.advance()?;
                    params.push(self.identifier()?);
                }
            }
            self.consume(TokenKind::RightParen, "')'")?;
        }

        self.consume(TokenKind::DoubleColon, "'::'")
            .map_err(|e| e.with_help("functions are written `fn name(params) :: body end`"))?;
        let body = self.expression()?;
        let next = self.chained_declaration()?;
        if self.check_keyword(Keyword::End) {
            self.advance()?;
        }

        Ok(Expr::FunctionDef {
            name,
            params: params.into(),
            body: Rc::new(body),
            next,
            position,
        })
    }

    /// `if` has no `end` of its own; an `end` after the else-branch belongs
    /// to the enclosing `fn`.
    fn if_expression(&mut self) -> Result<Expr> {
        let position = self.consume_keyword(Keyword::If)?.position;
        let condition = self.expression()?;
        self.consume_keyword(Keyword::Then)?;
        let then_branch = self.expression()?;
        self.consume_keyword(Keyword::Else)
            .map_err(|e| e.with_help("every `if` needs an `else` branch"))?;
        let else_branch = self.expression()?;

        Ok(Expr::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            position,
        })
    }

    /// `and let ...` / `and fn ...` after a declaration.
    fn chained_declaration(&mut self) -> Result<Option<Box<Expr>>> {
        if !self.check_keyword(Keyword::And) {
            return Ok(None);
        }
        self.advance()?;

        if !self.check_keyword(Keyword::Let) && !self.check_keyword(Keyword::Fn) {
            return Err(self.unexpected("'let' or 'fn'"));
        }
        Ok(Some(Box::new(self.atom()?)))
    }

    fn identifier(&mut self) -> Result<String> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    fn check_operator(&self, operator: Operator) -> bool {
        self.current.kind == TokenKind::Operator(operator)
    }

    fn match_operators(&mut self, operators: &[Operator]) -> Result<Option<Token>> {
        for operator in operators {
            if self.check_operator(*operator) {
                return self.advance().map(Some);
            }
        }
        Ok(None)
    }

    /// Moves to the next token and returns the one just consumed.
    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        self.consume(TokenKind::Keyword(keyword), &format!("'{}'", keyword.as_str()))
    }

    fn unexpected(&self, expected: &str) -> ZyError {
        ZyError::parse_error(self.current.position, expected, self.current.kind.to_string())
    }
}

fn binary(operator: Token, left: Expr, right: Expr) -> Expr {
    let op = match operator.kind {
        TokenKind::Operator(op) => BinaryOp::from_operator(op),
        _ => None,
    };
    match op {
        Some(op) => Expr::Binary {
            operator: op,
            left: Box::new(left),
            right: Box::new(right),
            position: operator.position,
        },
        // Only binary operator tokens are ever matched by the callers.
        None => unreachable!("token {} is not a binary operator", operator.kind),
    }
}

/// Lexes and parses `source` into a single expression.
pub fn parse_source(source: &str) -> Result<Expr> {
    Parser::new(Lexer::new(source))?.parse()
}
