//! Text to expression.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! relation := sum (("==" | "!=" | "<" | "<=" | ">" | ">=") sum)?
//! sum      := term (("+" | "-") term)*
//! term     := unary (("*" | "/") unary)*
//! unary    := ("-" | "+") unary | power
//! power    := primary ("^" unary)?
//! primary  := number | name | name "(" relation ")" | "$" digits
//!           | "(" relation ")" | "{" (relation ("," relation)*)? "}"
//! ```
//!
//! Names resolve against the declared symbols first, then against the
//! built-in constants. A name that is neither is an error; nothing is ever
//! declared on the fly.

use dashu::integer::IBig;
use hashbrown::HashMap;

use crate::cast::ex_to;
use crate::error::{ExError, Result};
use crate::eval;
use crate::ex::Ex;
use crate::flyweight::ex_1;
use crate::kind::{Symbol, TypeTag};
use crate::node::{ConstantId, FunctionId, RelOp};
use crate::numeric::Number;

/// Parses `text` with names resolved against `symbols`.
pub(crate) fn parse(text: &str, symbols: &Ex) -> Result<Ex> {
    let table = symbol_table(symbols)?;
    let mut parser = Parser {
        input: text,
        pos: 0,
        symbols: &table,
    };
    let result = parser.relation().and_then(|e| {
        parser.skip_ws();
        if parser.pos < text.len() {
            Err(parser.error("unexpected trailing input"))
        } else {
            Ok(e)
        }
    });
    if let Err(err) = &result {
        tracing::debug!(input = text, error = %err, "parse failed");
    }
    result
}

fn symbol_table(symbols: &Ex) -> Result<HashMap<String, Ex>> {
    let entries: Vec<Ex> = match symbols.tag() {
        TypeTag::Lst => symbols.ops().to_vec(),
        _ => vec![symbols.clone()],
    };
    let mut table = HashMap::with_capacity(entries.len());
    for entry in entries {
        if entry.tag() != TypeTag::Symbol {
            return Err(ExError::InvalidArgument(format!(
                "symbol table entry {entry} is not a symbol"
            )));
        }
        let name = ex_to::<Symbol>(&entry).name().to_string();
        table.insert(name, entry);
    }
    Ok(table)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    symbols: &'a HashMap<String, Ex>,
}

impl<'a> Parser<'a> {
    fn error(&self, message: &str) -> ExError {
        ExError::Parse {
            input: self.input.to_string(),
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{token}`")))
        }
    }

    fn relation(&mut self) -> Result<Ex> {
        const OPS: [(&str, RelOp); 6] = [
            ("==", RelOp::Equal),
            ("!=", RelOp::NotEqual),
            ("<=", RelOp::LessOrEqual),
            (">=", RelOp::GreaterOrEqual),
            ("<", RelOp::Less),
            (">", RelOp::Greater),
        ];
        let lhs = self.sum()?;
        for (token, op) in OPS {
            if self.eat(token) {
                let rhs = self.sum()?;
                return Ok(Ex::relational(lhs, op, rhs));
            }
        }
        Ok(lhs)
    }

    fn sum(&mut self) -> Result<Ex> {
        let mut terms = vec![self.term()?];
        loop {
            if self.eat("+") {
                terms.push(self.term()?);
            } else if self.eat("-") {
                let t = self.term()?;
                terms.push(eval::mul([ex_1(), t])?);
            } else {
                return Ok(eval::add(terms));
            }
        }
    }

    fn term(&mut self) -> Result<Ex> {
        let mut factors = vec![self.unary()?];
        loop {
            if self.eat("*") {
                factors.push(self.unary()?);
            } else if self.eat("/") {
                let d = self.unary()?;
                factors.push(eval::power(d, ex_1())?);
            } else {
                return eval::mul(factors);
            }
        }
    }

    fn unary(&mut self) -> Result<Ex> {
        if self.eat("-") {
            let operand = self.unary()?;
            eval::mul([ex_1(), operand])
        } else if self.eat("+") {
            self.unary()
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<Ex> {
        let base = self.primary()?;
        if self.eat("^") {
            let exp = self.unary()?;
            eval::power(base, exp)
        } else {
            Ok(base)
        }
    }

    fn primary(&mut self) -> Result<Ex> {
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some('$') => {
                self.pos += 1;
                let digits = self.take_while(|c| c.is_ascii_digit());
                let label = digits
                    .parse::<u32>()
                    .map_err(|_| self.error("expected a wildcard label"))?;
                Ok(Ex::wild(label))
            }
            Some('(') => {
                self.pos += 1;
                let inner = self.relation()?;
                self.expect(")")?;
                Ok(inner)
            }
            Some('{') => {
                self.pos += 1;
                let mut items = Vec::new();
                if !self.eat("}") {
                    loop {
                        items.push(self.relation()?);
                        if self.eat("}") {
                            break;
                        }
                        self.expect(",")?;
                    }
                }
                Ok(Ex::lst(items))
            }
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(self.rest().len(), |(i, _)| i);
        self.pos += len;
        &input[start..self.pos]
    }

    fn number(&mut self) -> Result<Ex> {
        let start = self.pos;
        self.take_while(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.rest().starts_with('.') {
            is_float = true;
            self.pos += 1;
            self.take_while(|c| c.is_ascii_digit());
        }
        if self.rest().starts_with(['e', 'E']) {
            let mark = self.pos;
            self.pos += 1;
            if self.rest().starts_with(['+', '-']) {
                self.pos += 1;
            }
            if self.take_while(|c| c.is_ascii_digit()).is_empty() {
                self.pos = mark;
            } else {
                is_float = true;
            }
        }
        let text = &self.input[start..self.pos];
        let value = if is_float {
            text.parse::<f64>().map(Number::float).ok()
        } else {
            text.parse::<IBig>().map(Number::from).ok()
        };
        match value {
            Some(n) => Ok(Ex::number(n)),
            None => {
                self.pos = start;
                Err(self.error("malformed number"))
            }
        }
    }

    fn name(&mut self) -> Result<Ex> {
        let start = self.pos;
        let name = self
            .take_while(|c| c.is_alphanumeric() || c == '_')
            .to_string();
        if self.eat("(") {
            let Some(id) = FunctionId::from_name(&name) else {
                self.pos = start;
                return Err(self.error(&format!("unknown function `{name}`")));
            };
            let arg = self.relation()?;
            self.expect(")")?;
            return eval::function(id, arg);
        }
        if let Some(sym) = self.symbols.get(&name) {
            return Ok(sym.clone());
        }
        if let Some(id) = ConstantId::from_name(&name) {
            return Ok(Ex::constant(id));
        }
        Err(ExError::UndeclaredSymbol {
            input: self.input.to_string(),
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{pow, sin};

    #[test]
    fn test_arithmetic_precedence() {
        let x = Ex::symbol("x");
        let e = Ex::parse("2*x^2 + 3*x - 1", &x).unwrap();
        assert_eq!(e, 2 * pow(&x, 2) + 3 * &x - 1);
        let neg = Ex::parse("-x^2", &x).unwrap();
        assert_eq!(neg, -pow(&x, 2));
        let div = Ex::parse("1/x/2", &x).unwrap();
        assert_eq!(div, pow(&x, -1) / 2);
    }

    #[test]
    fn test_symbols_resolve_to_declared_ones() {
        let x = Ex::symbol("x");
        let y = Ex::symbol("y");
        let syms = Ex::lst([x.clone(), y.clone()]);
        let e = Ex::parse("sin(x) + y", &syms).unwrap();
        assert_eq!(e, sin(&x) + &y);
        assert_ne!(e, sin(Ex::symbol("x")) + &y);
    }

    #[test]
    fn test_numbers_lists_and_relations() {
        let x = Ex::symbol("x");
        let e = Ex::parse("{1.5, 10^30, x == 3, $2}", &x).unwrap();
        assert_eq!(e.nops(), 4);
        assert_eq!(e.op(0), Ex::from(1.5));
        assert_eq!(e.op(1).to_string(), format!("1{}", "0".repeat(30)));
        assert!(e.op(2).info(crate::flags::Info::RelationEqual));
        assert_eq!(e.op(3), Ex::wild(2));
        assert_eq!(Ex::parse("{}", &x).unwrap().nops(), 0);
        assert_eq!(Ex::parse("Pi", &x).unwrap(), Ex::constant(ConstantId::Pi));
    }

    #[test]
    fn test_undeclared_symbol() {
        let x = Ex::symbol("x");
        assert_eq!(
            Ex::parse("x + y", &x),
            Err(ExError::UndeclaredSymbol {
                input: "x + y".to_string(),
                name: "y".to_string(),
            })
        );
    }

    #[test]
    fn test_malformed_input_reports_position() {
        let x = Ex::symbol("x");
        match Ex::parse("x + * 2", &x) {
            Err(ExError::Parse {
                input, position, ..
            }) => {
                assert_eq!(input, "x + * 2");
                assert_eq!(position, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(Ex::parse("(x", &x), Err(ExError::Parse { .. })));
        assert!(matches!(Ex::parse("x x", &x), Err(ExError::Parse { .. })));
        assert!(matches!(Ex::parse("foo(x)", &x), Err(ExError::Parse { .. })));
        assert!(matches!(
            Ex::parse("x", &Ex::from(1)),
            Err(ExError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_evaluation_errors_propagate() {
        let x = Ex::symbol("x");
        assert_eq!(Ex::parse("1/0", &x), Err(ExError::DivisionByZero));
        assert_eq!(Ex::parse("log(0)", &x), Err(ExError::DivisionByZero));
    }
}
