//! Parser for the `OpenQASM` 2 subset.

use crate::ast::{GateCall, Operand, Program, RegisterDecl, Statement};
use crate::error::{QasmError, QasmResult};
use crate::lexer::{SpannedToken, Token, line_of, tokenize};

/// Gates with more operands than this are rejected.
pub const MAX_GATE_OPERANDS: usize = 2;

/// Keywords of the full language that the subset does not handle.
const UNSUPPORTED_KEYWORDS: [&str; 3] = ["gate", "opaque", "if"];

/// Parse a QASM source string.
pub fn parse(source: &str) -> QasmResult<Program> {
    Parser::new(source)?.parse_program()
}

/// Parser state.
struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> QasmResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(QasmError::LexerError {
                        line: line_of(source, span.start),
                        message,
                    });
                }
            }
        }
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Line of the current token, or of the end of input.
    fn line(&self) -> usize {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |t| t.span.start);
        line_of(self.source, offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    fn unexpected(&self, expected: &str, found: &Token) -> QasmError {
        QasmError::UnexpectedToken {
            line: self.line(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn expect(&mut self, expected: Token) -> QasmResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| QasmError::UnexpectedEof(format!("expected {expected}")))?;
        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(QasmError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_program(&mut self) -> QasmResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    fn parse_version(&mut self) -> QasmResult<String> {
        let version = match self.advance() {
            Some(Token::FloatLiteral(v)) => format!("{v:.1}"),
            Some(Token::IntLiteral(v)) => format!("{v}.0"),
            Some(other) => return Err(QasmError::InvalidVersion(other.to_string())),
            None => return Err(QasmError::UnexpectedEof("version number".into())),
        };
        if !version.starts_with("2.") {
            return Err(QasmError::InvalidVersion(version));
        }
        Ok(version)
    }

    fn parse_statement(&mut self) -> QasmResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| QasmError::UnexpectedEof("statement".into()))?;

        let statement = match token {
            Token::Include => {
                self.pos += 1;
                match self.advance() {
                    Some(Token::StringLiteral(path)) => Statement::Include(path),
                    Some(other) => return Err(self.unexpected("string literal", &other)),
                    None => return Err(QasmError::UnexpectedEof("include path".into())),
                }
            }
            Token::Qreg => {
                self.pos += 1;
                Statement::QReg(self.parse_register_decl()?)
            }
            Token::Creg => {
                self.pos += 1;
                Statement::CReg(self.parse_register_decl()?)
            }
            Token::Measure => {
                self.pos += 1;
                let qubit = self.parse_operand()?;
                self.expect(Token::Arrow)?;
                let bit = self.parse_operand()?;
                Statement::Measure { qubit, bit }
            }
            Token::Reset => {
                self.pos += 1;
                Statement::Reset(self.parse_operand()?)
            }
            Token::Barrier => {
                self.pos += 1;
                Statement::Barrier(self.parse_operand_list()?)
            }
            Token::Identifier(name) => Statement::Gate(self.parse_gate_call(name)?),
            other => return Err(self.unexpected("statement", &other)),
        };

        self.expect(Token::Semicolon)?;
        Ok(statement)
    }

    fn parse_register_decl(&mut self) -> QasmResult<RegisterDecl> {
        let name = self.parse_identifier()?;
        let size = if self.consume(&Token::LBracket) {
            let size = self.parse_index()?;
            self.expect(Token::RBracket)?;
            size
        } else {
            1
        };
        Ok(RegisterDecl { name, size })
    }

    fn parse_gate_call(&mut self, name: String) -> QasmResult<GateCall> {
        let line = self.line();
        if UNSUPPORTED_KEYWORDS.contains(&name.as_str()) {
            return Err(QasmError::Unsupported {
                line,
                message: format!("'{name}' statements"),
            });
        }
        self.pos += 1;

        let params = if self.check(&Token::LParen) {
            self.parse_params()?
        } else {
            None
        };

        let operands = self.parse_operand_list()?;
        if operands.len() > MAX_GATE_OPERANDS {
            return Err(QasmError::Unsupported {
                line,
                message: format!(
                    "gate '{name}' acts on {} qubits (at most {MAX_GATE_OPERANDS})",
                    operands.len()
                ),
            });
        }

        Ok(GateCall {
            name,
            params,
            operands,
            line,
        })
    }

    /// Parenthesized parameter list, kept as raw source text.
    fn parse_params(&mut self) -> QasmResult<Option<String>> {
        self.expect(Token::LParen)?;
        let start = self.pos;
        let mut depth = 0_usize;

        loop {
            let line = self.line();
            match self.advance() {
                Some(Token::LParen) => depth += 1,
                Some(Token::RParen) if depth == 0 => break,
                Some(Token::RParen) => depth -= 1,
                Some(Token::Semicolon) => {
                    return Err(QasmError::UnexpectedToken {
                        line,
                        expected: ")".into(),
                        found: ";".into(),
                    });
                }
                Some(_) => {}
                None => return Err(QasmError::UnexpectedEof("expected )".into())),
            }
        }

        // `self.pos - 1` is the closing parenthesis.
        let end = self.pos - 1;
        if start == end {
            return Ok(None);
        }
        let from = self.tokens[start].span.start;
        let to = self.tokens[end - 1].span.end;
        Ok(Some(self.source[from..to].to_string()))
    }

    fn parse_operand_list(&mut self) -> QasmResult<Vec<Operand>> {
        let mut operands = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_operand()?);
        }
        Ok(operands)
    }

    fn parse_operand(&mut self) -> QasmResult<Operand> {
        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Ok(Operand::indexed(register, index))
        } else {
            Ok(Operand::whole(register))
        }
    }

    fn parse_identifier(&mut self) -> QasmResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => {
                self.pos -= 1;
                Err(self.unexpected("identifier", &other))
            }
            None => Err(QasmError::UnexpectedEof("identifier".into())),
        }
    }

    fn parse_index(&mut self) -> QasmResult<u32> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => u32::try_from(v).map_err(|_| QasmError::Unsupported {
                line: self.line(),
                message: format!("index {v} does not fit in 32 bits"),
            }),
            Some(other) => {
                self.pos -= 1;
                Err(self.unexpected("integer", &other))
            }
            None => Err(QasmError::UnexpectedEof("integer".into())),
        }
    }
}
