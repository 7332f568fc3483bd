//! AST node definitions and renderings.
//!
//! Every node renders through `Display` into the operator-parenthesized
//! form the test suites and `Quote` printing rely on: `(a + b)`, `(-x)`,
//! `if (x < y) { x } else { y }`, `fn(a, b) ...`. The [`modify`] family
//! implements the post-order rewrite the macro engine is built on.

use std::fmt;

use strum::Display;

/// A parsed program: an ordered list of statements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Let { name: String, value: Expression },
    Return(Expression),
    Expression(Expression),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let { name, value } => write!(f, "let {name} = {value};"),
            Self::Return(value) => write!(f, "return {value};"),
            Self::Expression(expression) => write!(f, "{expression}"),
        }
    }
}

/// A braced sequence of statements, as used by `if`, `fn`, and `macro`.
///
/// Renders as the bare statement sequence; the surrounding construct
/// supplies braces where its rendering calls for them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PrefixOperator {
    #[strum(to_string = "!")]
    Bang,
    #[strum(to_string = "-")]
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InfixOperator {
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
    #[strum(to_string = "*")]
    Asterisk,
    #[strum(to_string = "/")]
    Slash,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "!=")]
    NotEq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Identifier(String),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    StringLiteral(String),
    ArrayLiteral(Vec<Expression>),
    /// Key/value pairs in source order. Duplicate keys are resolved at
    /// evaluation time (last write wins), not here.
    HashLiteral(Vec<(Expression, Expression)>),
    Prefix {
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        parameters: Vec<String>,
        body: BlockStatement,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
    MacroLiteral {
        parameters: Vec<String>,
        body: BlockStatement,
    },
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name) => f.write_str(name),
            Self::IntegerLiteral(value) => write!(f, "{value}"),
            Self::BooleanLiteral(value) => write!(f, "{value}"),
            Self::StringLiteral(value) => write!(f, "\"{value}\""),
            Self::ArrayLiteral(elements) => {
                write!(f, "[{}]", join(elements))
            }
            Self::HashLiteral(pairs) => {
                let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Self::Prefix { operator, right } => write!(f, "({operator}{right})"),
            Self::Infix { left, operator, right } => write!(f, "({left} {operator} {right})"),
            Self::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {condition} {{ {consequence} }}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {{ {alternative} }}")?;
                }
                Ok(())
            }
            Self::FunctionLiteral { parameters, body } => {
                write!(f, "fn({}) {body}", parameters.join(", "))
            }
            Self::Call { function, arguments } => {
                write!(f, "{function}({})", join(arguments))
            }
            Self::Index { left, index } => write!(f, "({left}[{index}])"),
            Self::MacroLiteral { parameters, body } => {
                write!(f, "macro({}) {body}", parameters.join(", "))
            }
        }
    }
}

fn join(expressions: &[Expression]) -> String {
    expressions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rewrites every expression in a program bottom-up.
///
/// The transformer runs post-order: children are rebuilt first, then the
/// rebuilt node itself is handed to `transform`. Macro expansion and
/// `unquote` substitution are both expressed as transformers over this
/// traversal.
pub fn modify_program(program: Program, transform: &mut impl FnMut(Expression) -> Expression) -> Program {
    Program {
        statements: program
            .statements
            .into_iter()
            .map(|statement| modify_statement(statement, transform))
            .collect(),
    }
}

pub fn modify_statement(statement: Statement, transform: &mut impl FnMut(Expression) -> Expression) -> Statement {
    match statement {
        Statement::Let { name, value } => Statement::Let {
            name,
            value: modify_expression(value, transform),
        },
        Statement::Return(value) => Statement::Return(modify_expression(value, transform)),
        Statement::Expression(expression) => Statement::Expression(modify_expression(expression, transform)),
    }
}

fn modify_block(block: BlockStatement, transform: &mut impl FnMut(Expression) -> Expression) -> BlockStatement {
    BlockStatement {
        statements: block
            .statements
            .into_iter()
            .map(|statement| modify_statement(statement, transform))
            .collect(),
    }
}

pub fn modify_expression(expression: Expression, transform: &mut impl FnMut(Expression) -> Expression) -> Expression {
    let rebuilt = match expression {
        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: Box::new(modify_expression(*right, transform)),
        },
        Expression::Infix { left, operator, right } => Expression::Infix {
            left: Box::new(modify_expression(*left, transform)),
            operator,
            right: Box::new(modify_expression(*right, transform)),
        },
        Expression::If {
            condition,
            consequence,
            alternative,
        } => Expression::If {
            condition: Box::new(modify_expression(*condition, transform)),
            consequence: modify_block(consequence, transform),
            alternative: alternative.map(|block| modify_block(block, transform)),
        },
        Expression::ArrayLiteral(elements) => Expression::ArrayLiteral(
            elements
                .into_iter()
                .map(|element| modify_expression(element, transform))
                .collect(),
        ),
        Expression::HashLiteral(pairs) => Expression::HashLiteral(
            pairs
                .into_iter()
                .map(|(key, value)| {
                    (
                        modify_expression(key, transform),
                        modify_expression(value, transform),
                    )
                })
                .collect(),
        ),
        Expression::Index { left, index } => Expression::Index {
            left: Box::new(modify_expression(*left, transform)),
            index: Box::new(modify_expression(*index, transform)),
        },
        Expression::FunctionLiteral { parameters, body } => Expression::FunctionLiteral {
            parameters,
            body: modify_block(body, transform),
        },
        Expression::MacroLiteral { parameters, body } => Expression::MacroLiteral {
            parameters,
            body: modify_block(body, transform),
        },
        Expression::Call { function, arguments } => Expression::Call {
            function: Box::new(modify_expression(*function, transform)),
            arguments: arguments
                .into_iter()
                .map(|argument| modify_expression(argument, transform))
                .collect(),
        },
        leaf @ (Expression::Identifier(_)
        | Expression::IntegerLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::StringLiteral(_)) => leaf,
    };
    transform(rebuilt)
}
