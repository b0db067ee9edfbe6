// ABOUTME: Pratt precedence-climbing parser producing an AST plus line-tagged errors

use crate::ast::{BlockKind, Expr, Param, Program, Stmt, TypeName};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[repr(u8)]
enum Precedence {
    Lessvalue = 0,
    Equals = 1,
    LessGreater = 2,
    Sum = 3,
    Product = 4,
    Prefix = 5,
    Call = 6,
    Index = 7,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    use TokenKind::*;
    match kind {
        Eq | NotEq => Precedence::Equals,
        Lt | LtEq | Gt | GtEq | And | Or => Precedence::LessGreater,
        Plus | Minus => Precedence::Sum,
        Star | Slash | Percent => Precedence::Product,
        Assign | ColonAssign | PlusAssign | MinusAssign | StarAssign | SlashAssign
        | PercentAssign => Precedence::Prefix,
        LParen => Precedence::Call,
        LBracket | PlusPlus | MinusMinus => Precedence::Index,
        _ => Precedence::Lessvalue,
    }
}

pub struct Parser {
    lexer: Lexer,
    cur: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Parser {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    /// `parse(tokens) -> Program | [ParseError]` (§6.2 item 2): the
    /// program is always returned, possibly partial, alongside
    /// whatever diagnostics accumulated.
    pub fn parse_program(mut self) -> (Program, Vec<ParseError>) {
        let mut program = Vec::new();
        while self.cur.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                program.push(stmt);
            }
            self.next_token();
        }
        (program, self.errors)
    }

    fn next_token(&mut self) {
        self.cur = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(ParseError::new(self.cur.line, message));
    }

    /// Advances past `peek` if it matches `kind`; otherwise records an
    /// error and leaves position unchanged.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.error(format!(
                "expected next token to be {kind}, got {} instead",
                self.peek.kind
            ));
            false
        }
    }

    fn peek_type_name(&self) -> Option<TypeName> {
        TypeName::from_token(self.peek.kind)
    }

    // ---- statements ----------------------------------------------------

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cur.kind {
            TokenKind::Var => self.parse_decl_statement(false),
            TokenKind::Global => self.parse_decl_statement(true),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Import => self.parse_import_statement(),
            TokenKind::Fn => self.parse_function_statement(),
            TokenKind::Comment => None,
            _ => self.parse_expression_statement(),
        }
    }

    fn default_literal_for(&self, ty: TypeName, line: usize) -> Option<Expr> {
        Some(match ty {
            TypeName::Int => Expr::Integer { value: 0, line },
            TypeName::Bool => Expr::Boolean { value: false, line },
            TypeName::String => Expr::Str {
                value: String::new(),
                line,
            },
            TypeName::Double => Expr::Double { value: 0.0, line },
            TypeName::List => Expr::List {
                elements: Vec::new(),
                line,
            },
            TypeName::Map => Expr::Hash {
                pairs: Vec::new(),
                line,
            },
            TypeName::Func | TypeName::Stream => return None,
        })
    }

    /// Shared implementation of `var`/`global` declaration parsing;
    /// they differ only in which AST variant and environment target
    /// the result is marked for.
    fn parse_decl_statement(&mut self, is_global: bool) -> Option<Stmt> {
        let line = self.cur.line;

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur.literal.clone();

        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        let Some(declared_type) = self.peek_type_name() else {
            self.error(format!("type '{}' is not declared", self.peek.literal));
            return None;
        };
        self.next_token();
        self.next_token();

        let init = if self.cur_is(TokenKind::Eof) || self.cur_is(TokenKind::Semicolon) {
            match self.default_literal_for(declared_type, line) {
                Some(expr) => Some(expr),
                None => {
                    self.error(format!(
                        "var {name} '{}' must have an initialiser",
                        declared_type.as_str()
                    ));
                    return None;
                }
            }
        } else if self.cur_is(TokenKind::Assign) {
            self.next_token();
            let expr = self.parse_expression(Precedence::Lessvalue)?;
            let widened = self.check_decl_type(&name, declared_type, expr)?;
            if self.peek_is(TokenKind::Semicolon) {
                self.next_token();
            }
            Some(widened)
        } else {
            self.error(format!("token incorrect '{}'", self.cur.literal));
            return None;
        };

        if is_global {
            Some(Stmt::Global {
                name,
                declared_type,
                init,
                line,
            })
        } else {
            Some(Stmt::Var {
                name,
                declared_type,
                init,
                line,
            })
        }
    }

    /// Enforces §4.2's declaration-parsing type agreement, with the one
    /// permitted widening (`int` literal → `Double` when the declared
    /// type is `double`).
    fn check_decl_type(&mut self, name: &str, declared: TypeName, expr: Expr) -> Option<Expr> {
        let actual = match &expr {
            Expr::Hash { .. } => TypeName::Map,
            Expr::List { .. } => TypeName::List,
            Expr::Integer { value, line } => {
                if declared == TypeName::Double {
                    return Some(Expr::Double {
                        value: *value as f64,
                        line: *line,
                    });
                }
                TypeName::Int
            }
            Expr::Boolean { .. } => TypeName::Bool,
            Expr::Str { .. } => TypeName::String,
            Expr::Double { .. } => TypeName::Double,
            Expr::FunctionClosure { .. } => TypeName::Func,
            // Anything else (identifiers, calls, infix expressions, …)
            // can't be type-checked until evaluation; defer to the
            // evaluator's re-check, per §4.3.
            _ => return Some(expr),
        };
        if actual != declared {
            self.error(format!(
                "declaration error: var {name} '{}' = {}",
                declared.as_str(),
                actual.as_str().to_uppercase()
            ));
            return None;
        }
        Some(expr)
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let line = self.cur.line;
        self.next_token();
        let value = if self.cur_is(TokenKind::Semicolon) || self.cur_is(TokenKind::RBrace) {
            None
        } else {
            let expr = self.parse_expression(Precedence::Lessvalue);
            if self.peek_is(TokenKind::Semicolon) {
                self.next_token();
            }
            expr
        };
        Some(Stmt::Return { value, line })
    }

    fn parse_break_statement(&mut self) -> Option<Stmt> {
        let line = self.cur.line;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Stmt::Break { line })
    }

    fn parse_import_statement(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::Str) {
            self.error("import expression wrong");
            return None;
        }
        let path = self.cur.literal.clone();
        if let Err(e) = self.lexer.push_import(&path) {
            self.error(format!("incorrect path file '{path}': {e}"));
        }
        None
    }

    fn parse_function_statement(&mut self) -> Option<Stmt> {
        let line = self.cur.line;
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur.literal.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_params()?;

        let return_type = self.parse_optional_return_type()?;

        if !self.cur_is(TokenKind::LBrace) {
            self.error(format!(
                "function expression is incorrect: {}",
                self.cur.literal
            ));
            return None;
        }
        let body = self.parse_block_statement(BlockKind::Fn)?;

        Some(Stmt::Function {
            name,
            params,
            return_type,
            body: Box::new(body),
            line,
        })
    }

    fn parse_params(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(params);
        }
        self.next_token();
        params.push(self.parse_one_param()?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            params.push(self.parse_one_param()?);
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(params)
    }

    fn parse_one_param(&mut self) -> Option<Param> {
        let name = self.cur.literal.clone();
        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        let Some(declared_type) = self.peek_type_name() else {
            self.error("function parameters incorrect");
            return None;
        };
        self.next_token();
        Some(Param { name, declared_type })
    }

    /// After a parameter list's closing `)`, either a type name (the
    /// return type), or `{` directly (no return type).
    fn parse_optional_return_type(&mut self) -> Option<Option<TypeName>> {
        if let Some(ty) = self.peek_type_name() {
            self.next_token();
            self.next_token();
            Some(Some(ty))
        } else if self.peek_is(TokenKind::Ident) {
            self.error("function expression is incorrect");
            None
        } else if self.peek_is(TokenKind::LBrace) {
            self.next_token();
            Some(None)
        } else {
            Some(None)
        }
    }

    fn parse_for_statement(&mut self) -> Option<Stmt> {
        let line = self.cur.line;
        let parenthesised = self.peek_is(TokenKind::LParen);
        if parenthesised {
            self.next_token();
        }
        self.next_token();

        let semicolon_count = self.count_header_semicolons();

        match semicolon_count {
            0 => {
                let cond = self.parse_expression(Precedence::Lessvalue)?;

                if parenthesised && !self.expect_peek(TokenKind::RParen) {
                    self.error("for expression is incorrect, expected ')'");
                    return None;
                }
                if !self.expect_peek(TokenKind::LBrace) {
                    self.error("for expression is incorrect, expected '{'");
                    return None;
                }
                let body = self.parse_block_statement(BlockKind::For)?;
                Some(Stmt::For {
                    decl: None,
                    cond: Some(cond),
                    step: None,
                    body: Box::new(body),
                    line,
                })
            }
            2 => {
                let decl_expr = self.parse_expression(Precedence::Lessvalue)?;
                let decl_stmt = Stmt::Expr {
                    expr: decl_expr,
                    line,
                };
                if !self.expect_peek(TokenKind::Semicolon) {
                    self.error("for expression is incorrect, expected ';'");
                    return None;
                }
                self.next_token();
                let cond = self.parse_expression(Precedence::Lessvalue)?;
                if !self.expect_peek(TokenKind::Semicolon) {
                    self.error("for expression is incorrect, expected ';'");
                    return None;
                }
                self.next_token();
                let step = self.parse_expression(Precedence::Lessvalue)?;
                if parenthesised && !self.expect_peek(TokenKind::RParen) {
                    self.error("for expression is incorrect, expected ')'");
                    return None;
                }
                if !self.expect_peek(TokenKind::LBrace) {
                    self.error("for expression is incorrect, expected '{'");
                    return None;
                }
                let body = self.parse_block_statement(BlockKind::For)?;
                Some(Stmt::For {
                    decl: Some(Box::new(decl_stmt)),
                    cond: Some(cond),
                    step: Some(step),
                    body: Box::new(body),
                    line,
                })
            }
            _ => {
                self.error("count ';' incorrect");
                None
            }
        }
    }

    /// Speculatively scans forward to `{` counting `;` so the header
    /// form can be chosen before actually parsing it, then rewinds.
    fn count_header_semicolons(&mut self) -> usize {
        let save = self.lexer.save();
        let saved_cur = self.cur.clone();
        let saved_peek = self.peek.clone();

        let mut count = 0;
        while !self.cur_is(TokenKind::LBrace) && !self.cur_is(TokenKind::Eof) {
            if self.cur_is(TokenKind::Semicolon) {
                count += 1;
            }
            self.next_token();
        }

        self.lexer.restore(save);
        self.cur = saved_cur;
        self.peek = saved_peek;
        count
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let line = self.cur.line;
        let expr = self.parse_expression(Precedence::Lessvalue)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Stmt::Expr { expr, line })
    }

    fn parse_block_statement(&mut self, kind: BlockKind) -> Option<Stmt> {
        let line = self.cur.line;
        if !self.cur_is(TokenKind::LBrace) {
            self.error("block definition is incorrect, expected '{'");
            return None;
        }
        let mut stmts = Vec::new();
        self.next_token();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            }
            self.next_token();
        }
        Some(Stmt::Block { stmts, kind, line })
    }

    // ---- expressions -----------------------------------------------------

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur.kind)
    }

    fn is_postfix_op(kind: TokenKind) -> bool {
        matches!(kind, TokenKind::PlusPlus | TokenKind::MinusMinus)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        if Self::is_postfix_op(self.peek.kind) {
            return self.parse_postfix_expression();
        }

        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            if !self.has_infix(self.peek.kind) {
                return Some(left);
            }
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn has_infix(&self, kind: TokenKind) -> bool {
        use TokenKind::*;
        matches!(
            kind,
            Plus | Minus
                | Star
                | Slash
                | Percent
                | NotEq
                | Eq
                | LtEq
                | GtEq
                | Lt
                | Gt
                | And
                | Or
                | Assign
                | PlusAssign
                | MinusAssign
                | StarAssign
                | SlashAssign
                | PercentAssign
                | ColonAssign
                | LParen
                | LBracket
        )
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        use TokenKind::*;
        match self.cur.kind {
            Int => self.parse_integer_literal(),
            Double => self.parse_double_literal(),
            Ident => Some(self.parse_identifier()),
            Nil => Some(Expr::Nil { line: self.cur.line }),
            True | False => Some(self.parse_boolean_literal()),
            Str => Some(self.parse_string_literal()),
            LParen => self.parse_grouped_expression(),
            Not | Minus => self.parse_prefix_expression(),
            If => self.parse_if_expression(),
            Fn => self.parse_fn_closure(),
            LBracket => self.parse_list_expression(),
            LBrace => self.parse_hash_expression(),
            // `int` and `double` double as conversion built-ins, so a type
            // keyword in expression position (e.g. `int(x)`) parses as a
            // plain identifier rather than a type annotation.
            TypeInt | TypeDouble => Some(self.parse_identifier()),
            _ => {
                self.error(format!(
                    "no prefix parse function for '{}' found, literal '{}'",
                    self.cur.kind, self.cur.literal
                ));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        use TokenKind::*;
        match self.cur.kind {
            Plus | Minus | Star | Slash | Percent | NotEq | Eq | LtEq | GtEq | Lt | Gt | And
            | Or => self.parse_infix_expression(left),
            Assign => self.parse_assign_expression(left),
            PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign => {
                self.parse_assign_op_expression(left)
            }
            ColonAssign => self.parse_implicit_expression(left),
            LParen => self.parse_call_expression(left),
            LBracket => self.parse_index_expression(left),
            _ => {
                self.error("unexpected infix token");
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let line = self.cur.line;
        match self.cur.literal.parse::<i64>() {
            Ok(value) => Some(Expr::Integer { value, line }),
            Err(_) => {
                self.error(format!("could not parse '{}' as integer", self.cur.literal));
                None
            }
        }
    }

    fn parse_double_literal(&mut self) -> Option<Expr> {
        let line = self.cur.line;
        match self.cur.literal.parse::<f64>() {
            Ok(value) => Some(Expr::Double { value, line }),
            Err(_) => {
                self.error(format!("could not parse '{}' as double", self.cur.literal));
                None
            }
        }
    }

    fn parse_identifier(&self) -> Expr {
        Expr::Identifier {
            name: self.cur.literal.clone(),
            line: self.cur.line,
        }
    }

    fn parse_boolean_literal(&self) -> Expr {
        Expr::Boolean {
            value: self.cur_is(TokenKind::True),
            line: self.cur.line,
        }
    }

    fn parse_string_literal(&self) -> Expr {
        Expr::Str {
            value: self.cur.literal.clone(),
            line: self.cur.line,
        }
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lessvalue)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let line = self.cur.line;
        let op = self.cur.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix {
            op,
            right: Box::new(right),
            line,
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let line = self.cur.line;
        let op = self.cur.literal.clone();
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix {
            op,
            left: Box::new(left),
            right: Box::new(right),
            line,
        })
    }

    fn parse_postfix_expression(&mut self) -> Option<Expr> {
        let prefix = self.parse_prefix()?;
        let Expr::Identifier { name, line } = prefix else {
            self.error("postfix operand must be an identifier");
            return None;
        };
        self.next_token();
        let op = self.cur.literal.clone();
        self.next_token();
        Some(Expr::Postfix {
            op,
            left_ident: name,
            line,
        })
    }

    fn parse_implicit_expression(&mut self, left: Expr) -> Option<Expr> {
        let line = self.cur.line;
        let Expr::Identifier { name, .. } = left else {
            self.error("declaration is not possible, left side is not an identifier");
            return None;
        };
        self.next_token();
        let right = self.parse_expression(Precedence::Lessvalue)?;
        Some(Expr::ImplicitDecl {
            left_ident: name,
            right: Box::new(right),
            line,
        })
    }

    fn parse_assign_expression(&mut self, left: Expr) -> Option<Expr> {
        let line = self.cur.line;
        if !matches!(left, Expr::Identifier { .. } | Expr::Index { .. }) {
            self.error("assignment target must be an identifier or index expression");
            return None;
        }
        self.next_token();
        let right = self.parse_expression(Precedence::Lessvalue)?;
        Some(Expr::Assign {
            left: Box::new(left),
            right: Box::new(right),
            line,
        })
    }

    fn parse_assign_op_expression(&mut self, left: Expr) -> Option<Expr> {
        let line = self.cur.line;
        let op = self.cur.literal.clone();
        let Expr::Identifier { name, .. } = left else {
            self.error("compound-assignment target must be an identifier");
            return None;
        };
        self.next_token();
        let right = self.parse_expression(Precedence::Lessvalue)?;
        Some(Expr::AssignOp {
            left_ident: name,
            op,
            right: Box::new(right),
            line,
        })
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let line = self.cur.line;
        self.next_token();
        let index = self.parse_expression(Precedence::Lessvalue)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expr::Index {
            left: Box::new(left),
            index: Box::new(index),
            line,
        })
    }

    fn parse_call_expression(&mut self, callee: Expr) -> Option<Expr> {
        let line = self.cur.line;
        let args = self.parse_expr_list(TokenKind::RParen)?;
        Some(Expr::Call {
            callee: Box::new(callee),
            args,
            line,
        })
    }

    fn parse_expr_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut items = Vec::new();
        if self.peek_is(end) {
            self.next_token();
            return Some(items);
        }
        self.next_token();
        items.push(self.parse_expression(Precedence::Lessvalue)?);
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            items.push(self.parse_expression(Precedence::Lessvalue)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(items)
    }

    fn parse_list_expression(&mut self) -> Option<Expr> {
        let line = self.cur.line;
        let elements = self.parse_expr_list(TokenKind::RBracket)?;
        Some(Expr::List { elements, line })
    }

    fn parse_hash_expression(&mut self) -> Option<Expr> {
        let line = self.cur.line;
        let mut pairs = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lessvalue)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lessvalue)?;
            pairs.push((key, value));
            if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }
        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }
        Some(Expr::Hash { pairs, line })
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        let line = self.cur.line;
        let parenthesised = self.peek_is(TokenKind::LParen);
        self.next_token();
        if parenthesised {
            self.next_token();
        }
        let cond = self.parse_expression(Precedence::Lessvalue)?;
        if parenthesised && !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        self.next_token();
        if !self.cur_is(TokenKind::LBrace) {
            self.error("if expression is incorrect, expected '{'");
            return None;
        }
        let then_branch = self.parse_block_statement(BlockKind::If)?;

        let else_branch = if self.peek_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                self.error("else expression is incorrect, expected '{'");
                return None;
            }
            Some(Box::new(self.parse_block_statement(BlockKind::If)?))
        } else {
            None
        };

        Some(Expr::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch,
            line,
        })
    }

    fn parse_fn_closure(&mut self) -> Option<Expr> {
        let line = self.cur.line;
        self.next_token();
        if !self.cur_is(TokenKind::LParen) {
            self.error("function closure expression is incorrect");
            return None;
        }
        let params = self.parse_params()?;
        let return_type = self.parse_optional_return_type()?;
        if !self.cur_is(TokenKind::LBrace) {
            self.error("function closure expression is incorrect");
            return None;
        }
        let body = self.parse_block_statement(BlockKind::Fn)?;
        Some(Expr::FunctionClosure {
            params,
            return_type,
            body: Box::new(body),
            line,
        })
    }
}

/// Convenience entry point matching §6.2's `parse(lexer) -> (Program,
/// [ErrorMessage])` contract.
pub fn parse(lexer: Lexer) -> (Program, Vec<ParseError>) {
    Parser::new(lexer).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Program {
        let (program, errors) = parse(Lexer::new(src));
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        program
    }

    #[test]
    fn var_declaration_with_default() {
        let program = parse_ok("var x:int;");
        assert_eq!(program.len(), 1);
        assert!(matches!(
            &program[0],
            Stmt::Var { init: Some(Expr::Integer { value: 0, .. }), .. }
        ));
    }

    #[test]
    fn var_declaration_widens_int_to_double() {
        let program = parse_ok("var x:double = 5;");
        assert!(matches!(
            &program[0],
            Stmt::Var { init: Some(Expr::Double { value, .. }), .. } if *value == 5.0
        ));
    }

    #[test]
    fn function_declaration_with_return_type() {
        let program = parse_ok("fn add(x:int, y:int) int { return x+y; }");
        match &program[0] {
            Stmt::Function {
                name,
                params,
                return_type,
                ..
            } => {
                assert_eq!(name, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(*return_type, Some(TypeName::Int));
            }
            other => panic!("expected Function, got {other:?}"),
        }
    }

    #[test]
    fn classical_for_header_counts_two_semicolons() {
        let program = parse_ok("for (i := 0; i < 3; i++) { }");
        assert!(matches!(
            &program[0],
            Stmt::For { decl: Some(_), step: Some(_), .. }
        ));
    }

    #[test]
    fn range_for_header_has_no_semicolons() {
        let program = parse_ok("for (x := [1, 2]) { }");
        assert!(matches!(&program[0], Stmt::For { decl: None, .. }));
    }

    #[test]
    fn postfix_increment_on_identifier() {
        let program = parse_ok("var i:int = 0; i++;");
        match &program[1] {
            Stmt::Expr {
                expr: Expr::Postfix { op, left_ident, .. },
                ..
            } => {
                assert_eq!(op, "++");
                assert_eq!(left_ident, "i");
            }
            other => panic!("expected postfix expression statement, got {other:?}"),
        }
    }

    #[test]
    fn index_assignment_target() {
        let program = parse_ok("a[1] = 99;");
        assert!(matches!(
            &program[0],
            Stmt::Expr { expr: Expr::Assign { left, .. }, .. } if matches!(**left, Expr::Index { .. })
        ));
    }

    #[test]
    fn if_expression_with_else() {
        let program = parse_ok("if x { 1; } else { 2; }");
        assert!(matches!(
            &program[0],
            Stmt::Expr { expr: Expr::If { else_branch: Some(_), .. }, .. }
        ));
    }

    #[test]
    fn malformed_declaration_reports_error() {
        let (_, errors) = parse(Lexer::new("var x bogus;"));
        assert!(!errors.is_empty());
    }
}
