use std::rc::Rc;

use crate::ast::{
    BinOp, ExampleDecl, Expr, ExprKind, FnDecl, Hook, HookDecl, Item, Script, Stmt, StmtKind,
    UnaryOp,
};
use crate::error::{Pos, ScriptError};
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

/// Deepest combined nesting of blocks, sub-expressions and operator chains.
pub const MAX_NESTING: usize = 64;

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    /// Runs `f` one nesting level deeper. Levels taken by [`deepen`](Self::deepen)
    /// inside `f` are given back when it returns.
    fn nested<T>(
        &mut self,
        what: &str,
        f: impl FnOnce(&mut Self) -> Result<T, ScriptError>,
    ) -> Result<T, ScriptError> {
        let saved = self.depth;
        self.deepen(what)?;
        let result = f(self);
        self.depth = saved;
        result
    }

    /// Takes one nesting level for the rest of the enclosing [`nested`](Self::nested) call.
    /// Operator and postfix chains build left-leaning trees, so each link counts.
    fn deepen(&mut self, what: &str) -> Result<(), ScriptError> {
        if self.depth >= MAX_NESTING {
            return Err(self.err(format!("{} nested too deeply", what)));
        }
        self.depth += 1;
        Ok(())
    }

    fn current_pos(&self) -> Pos {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.pos)
            .unwrap_or(Pos::new(1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).map(|t| t.token.clone()).unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn err(&self, msg: impl Into<String>) -> ScriptError {
        let pos = self.current_pos();
        ScriptError::parse(msg, pos.line, pos.col)
    }

    fn expect_ident(&mut self) -> Result<String, ScriptError> {
        match self.peek().clone() {
            Token::Ident(s) => {
                self.advance();
                Ok(s)
            }
            tok => Err(self.err(format!("expected identifier, got {:?}", tok))),
        }
    }

    fn expect_token(&mut self, expected: &Token) -> Result<(), ScriptError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.err(format!("expected {:?}, got {:?}", expected, self.peek())))
        }
    }

    // ── Items ─────────────────────────────────────────────────────────────

    pub fn parse_script(&mut self) -> Result<Script, ScriptError> {
        let mut items = Vec::new();
        loop {
            let pos = self.current_pos();
            match self.peek() {
                Token::Eof => break,
                Token::Let => {
                    self.advance();
                    let name = self.expect_ident()?;
                    self.expect_token(&Token::Assign)?;
                    let value = self.parse_expr()?;
                    self.eat(&Token::Semi);
                    items.push(Item::Const { name, value, pos });
                }
                Token::Fn => items.push(Item::Function(Rc::new(self.parse_fn()?))),
                Token::Example | Token::Feature => {
                    items.push(Item::Example(Rc::new(self.parse_example()?)))
                }
                tok => {
                    return Err(self.err(format!(
                        "expected `let`, `fn`, `example` or `feature` at file scope, got {:?}",
                        tok
                    )));
                }
            }
        }
        Ok(Script { items })
    }

    fn parse_fn(&mut self) -> Result<FnDecl, ScriptError> {
        let pos = self.current_pos();
        self.advance(); // `fn`
        let name = self.expect_ident()?;
        self.expect_token(&Token::LParen)?;
        let mut params = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                let param = self.expect_ident()?;
                if params.contains(&param) {
                    return Err(self.err(format!("duplicate parameter `{}`", param)));
                }
                params.push(param);
                if self.eat(&Token::RParen) {
                    break;
                }
                self.expect_token(&Token::Comma)?;
            }
        }
        let body = self.parse_block()?;
        Ok(FnDecl { name, params, body, pos })
    }

    fn parse_example(&mut self) -> Result<ExampleDecl, ScriptError> {
        let pos = self.current_pos();
        let is_feature = self.advance() == Token::Feature;
        let name = self.expect_ident()?;
        let caption = match self.peek().clone() {
            Token::Str(s) => {
                self.advance();
                Some(s)
            }
            _ => None,
        };
        self.expect_token(&Token::LBrace)?;

        let mut decl = ExampleDecl {
            name,
            is_feature,
            caption,
            vars: Vec::new(),
            methods: Vec::new(),
            hooks: Vec::new(),
            pos,
        };

        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(self.err(format!("unclosed `{}` body", decl.name))),
                Token::Var => {
                    self.advance();
                    let field = self.expect_ident()?;
                    if decl.vars.iter().any(|(name, _)| *name == field) {
                        return Err(self.err(format!("field `{}` declared twice", field)));
                    }
                    self.expect_token(&Token::Assign)?;
                    let value = self.parse_expr()?;
                    self.eat(&Token::Semi);
                    decl.vars.push((field, value));
                }
                Token::Fn => {
                    let method = self.parse_fn()?;
                    if decl.method(&method.name).is_some() {
                        return Err(self.err(format!("method `{}` declared twice", method.name)));
                    }
                    decl.methods.push(Rc::new(method));
                }
                Token::On => {
                    let hook = self.parse_hook()?;
                    if decl.hook(hook.hook).is_some() {
                        return Err(self.err(format!("hook `{}` declared twice", hook.hook.name())));
                    }
                    decl.hooks.push(hook);
                }
                tok => {
                    return Err(self.err(format!(
                        "unexpected {:?} inside `{}`, expected `var`, `fn` or `on`",
                        tok, decl.name
                    )));
                }
            }
        }
        Ok(decl)
    }

    fn parse_hook(&mut self) -> Result<HookDecl, ScriptError> {
        self.advance(); // `on`
        let name = self.expect_ident()?;
        let hook = Hook::from_name(&name).ok_or_else(|| self.err(format!("unknown hook `{}`", name)))?;
        let param = if self.eat(&Token::LParen) {
            let param = self.expect_ident()?;
            self.expect_token(&Token::RParen)?;
            Some(param)
        } else {
            None
        };
        if param.is_some() && !hook.takes_button() {
            return Err(self.err(format!("hook `{}` takes no parameter", name)));
        }
        let body = self.parse_block()?;
        Ok(HookDecl { hook, param, body })
    }

    // ── Statements ────────────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        self.nested("block", Self::parse_block_body)
    }

    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        self.expect_token(&Token::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    return Ok(stmts);
                }
                Token::Eof => return Err(self.err("unclosed '{' block")),
                _ => stmts.push(self.parse_stmt()?),
            }
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ScriptError> {
        let pos = self.current_pos();
        let kind = match self.peek() {
            Token::Let => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect_token(&Token::Assign)?;
                let value = self.parse_expr()?;
                self.eat(&Token::Semi);
                StmtKind::Let(name, value)
            }
            Token::If => return self.parse_if(),
            Token::While => {
                self.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                StmtKind::While { cond, body }
            }
            Token::For => {
                self.advance();
                let var = self.expect_ident()?;
                self.expect_token(&Token::In)?;
                let iter = self.parse_expr()?;
                let body = self.parse_block()?;
                StmtKind::For { var, iter, body }
            }
            Token::Return => {
                self.advance();
                let value = match self.peek() {
                    Token::Semi | Token::RBrace => None,
                    _ => Some(self.parse_expr()?),
                };
                self.eat(&Token::Semi);
                StmtKind::Return(value)
            }
            _ => {
                let expr = self.parse_expr()?;
                let kind = if self.eat(&Token::Assign) {
                    if !matches!(expr.kind, ExprKind::Name(_) | ExprKind::Index(..)) {
                        return Err(ScriptError::parse(
                            "left side of `=` must be a name or an index",
                            expr.pos.line,
                            expr.pos.col,
                        ));
                    }
                    StmtKind::Assign(expr, self.parse_expr()?)
                } else {
                    StmtKind::Expr(expr)
                };
                self.eat(&Token::Semi);
                kind
            }
        };
        Ok(Stmt { kind, pos })
    }

    fn parse_if(&mut self) -> Result<Stmt, ScriptError> {
        let pos = self.current_pos();
        self.advance(); // `if`
        let cond = self.parse_expr()?;
        let then = self.parse_block()?;
        let otherwise = if self.eat(&Token::Else) {
            if self.peek() == &Token::If {
                vec![self.nested("else-if chain", Self::parse_if)?]
            } else {
                self.parse_block()?
            }
        } else {
            Vec::new()
        };
        Ok(Stmt { kind: StmtKind::If { cond, then, otherwise }, pos })
    }

    // ── Expressions ───────────────────────────────────────────────────────

    pub fn parse_expr(&mut self) -> Result<Expr, ScriptError> {
        self.nested("expression", |p| p.parse_binary(0))
    }

    /// Precedence climbing over the binary operator table, loosest first.
    fn parse_binary(&mut self, level: usize) -> Result<Expr, ScriptError> {
        const LEVELS: &[&[(Token, BinOp)]] = &[
            &[(Token::Or, BinOp::Or)],
            &[(Token::And, BinOp::And)],
            &[(Token::Eq, BinOp::Eq), (Token::NotEq, BinOp::NotEq)],
            &[
                (Token::Lt, BinOp::Lt),
                (Token::LtEq, BinOp::LtEq),
                (Token::Gt, BinOp::Gt),
                (Token::GtEq, BinOp::GtEq),
            ],
            &[(Token::Plus, BinOp::Add), (Token::Minus, BinOp::Sub)],
            &[(Token::Star, BinOp::Mul), (Token::Slash, BinOp::Div), (Token::Percent, BinOp::Rem)],
        ];

        let Some(ops) = LEVELS.get(level) else {
            return self.parse_unary();
        };
        let mut lhs = self.parse_binary(level + 1)?;
        loop {
            let pos = self.current_pos();
            let Some(op) = ops.iter().find(|(tok, _)| tok == self.peek()).map(|(_, op)| *op) else {
                return Ok(lhs);
            };
            self.deepen("expression")?;
            self.advance();
            let rhs = self.parse_binary(level + 1)?;
            lhs = Expr { kind: ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), pos };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ScriptError> {
        self.nested("expression", Self::parse_unary_body)
    }

    fn parse_unary_body(&mut self) -> Result<Expr, ScriptError> {
        let pos = self.current_pos();
        let op = match self.peek() {
            Token::Minus => UnaryOp::Neg,
            Token::Not | Token::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr { kind: ExprKind::Unary(op, Box::new(operand)), pos })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_primary()?;
        loop {
            if matches!(self.peek(), Token::LParen | Token::LBracket) {
                self.deepen("expression")?;
            }
            match self.peek() {
                Token::LParen => {
                    let ExprKind::Name(name) = &expr.kind else {
                        return Err(self.err("only named functions can be called"));
                    };
                    let name = name.clone();
                    self.advance();
                    let args = self.parse_list(&Token::RParen)?;
                    expr = Expr { kind: ExprKind::Call(name, args), pos: expr.pos };
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect_token(&Token::RBracket)?;
                    let pos = expr.pos;
                    expr = Expr { kind: ExprKind::Index(Box::new(expr), Box::new(index)), pos };
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated expressions up to `close`; the opener is already consumed.
    fn parse_list(&mut self, close: &Token) -> Result<Vec<Expr>, ScriptError> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expr()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect_token(&Token::Comma)?;
            // trailing comma
            if self.eat(close) {
                return Ok(items);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        let pos = self.current_pos();
        let kind = match self.advance() {
            Token::Number(n) => ExprKind::Number(n),
            Token::Str(s) => ExprKind::Str(s),
            Token::Color(c) => ExprKind::Color(c),
            Token::True => ExprKind::Bool(true),
            Token::False => ExprKind::Bool(false),
            Token::None => ExprKind::None,
            Token::Ident(name) => ExprKind::Name(name),
            Token::LBracket => ExprKind::List(self.parse_list(&Token::RBracket)?),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect_token(&Token::RParen)?;
                return Ok(inner);
            }
            tok => {
                return Err(ScriptError::parse(
                    format!("expected an expression, got {:?}", tok),
                    pos.line,
                    pos.col,
                ));
            }
        };
        Ok(Expr { kind, pos })
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse a `.demo` source string into a [`Script`].
pub fn parse_str(src: &str) -> Result<Script, ScriptError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_script()
}
