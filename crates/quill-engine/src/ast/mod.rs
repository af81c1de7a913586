//! Abstract Syntax Tree (AST) definitions.
//!
//! Expressions and statements share one [`Node`] type: an expression in
//! statement position is its own expression statement, which lets a
//! program report the value of its last statement.
//!
//! Equality is structural, so parser tests compare trees built with the
//! constructor helpers on [`Node`] against parser output.

use std::rc::Rc;

/// A complete program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// The statements in the program
    pub body: Vec<Node>,
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Literals
    /// Numeric literal
    Number(f64),
    /// `true` / `false`
    Boolean(bool),
    /// String literal
    String(String),
    /// Regular expression literal, never compiled
    RegExp {
        /// Body between the slashes
        pattern: String,
        /// Flag characters after the closing slash
        flags: String,
    },
    /// `null`
    Null,
    /// Variable reference
    Identifier(String),

    // Operators
    /// Prefix operator other than `++`/`--`
    Unary(UnaryExpression),
    /// `++` / `--` in either position
    Update(UpdateExpression),
    /// Infix operator, including `&&`, `||` and `,`
    Binary(BinaryExpression),
    /// `object.name` or `object[expr]`
    PropertyAccess(PropertyAccess),
    /// `=` and the compound assignments
    Assignment(AssignmentExpression),
    /// `test ? consequent : alternate`
    Condition(ConditionalExpression),
    /// `callee(arguments...)`
    FunctionCall(CallExpression),
    /// Function expression
    Function(FunctionDefinition),

    // Statements
    /// Function declaration
    FunctionDeclaration(FunctionDefinition),
    /// Block statement { ... }
    Block(Vec<Node>),
    /// `var a = 1, b;`
    VariableStatement(Vec<VariableDeclarator>),
    /// Return statement with optional value
    Return(Option<Box<Node>>),
    /// If statement
    If(IfStatement),
    /// While statement
    While(WhileStatement),
    /// Do-while statement
    DoWhile(WhileStatement),
    /// For statement
    For(ForStatement),
    /// Break statement
    Break,
    /// Continue statement
    Continue,
    /// Empty statement (;)
    Empty,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `+x`
    Plus,
    /// `-x`
    Minus,
    /// `!x`
    Not,
    /// `~x`
    BitwiseNot,
    /// `typeof x`
    TypeOf,
    /// `void x`
    Void,
    /// `delete x`
    Delete,
}

/// A unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    /// The operator
    pub operator: UnaryOperator,
    /// The operand
    pub argument: Box<Node>,
}

/// Increment and decrement operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// `++x`
    PreIncrement,
    /// `--x`
    PreDecrement,
    /// `x++`
    PostIncrement,
    /// `x--`
    PostDecrement,
}

impl UpdateOperator {
    /// Amount added to the operand.
    pub fn delta(self) -> f64 {
        match self {
            UpdateOperator::PreIncrement | UpdateOperator::PostIncrement => 1.0,
            UpdateOperator::PreDecrement | UpdateOperator::PostDecrement => -1.0,
        }
    }

    /// Returns true if the expression yields the operand's old value.
    pub fn is_postfix(self) -> bool {
        matches!(
            self,
            UpdateOperator::PostIncrement | UpdateOperator::PostDecrement
        )
    }
}

/// An update expression (++/--).
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    /// The operator
    pub operator: UpdateOperator,
    /// The operand; an Identifier or PropertyAccess
    pub argument: Box<Node>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    /// `+`, concatenates when either side is a string
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulus,
    // Logical
    /// `&&`
    And,
    /// `||`
    Or,
    // Bitwise
    /// `&`
    BitwiseAnd,
    /// `|`
    BitwiseOr,
    /// `^`
    BitwiseXOr,
    /// `<<`
    LeftShift,
    /// `>>`
    SignedRightShift,
    /// `>>>`
    UnsignedRightShift,
    // Comparison
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanOrEqual,
    /// `>=`
    GreaterThanOrEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `===`
    StrictlyEqual,
    /// `!==`
    StrictlyNotEqual,
    // Other
    /// The comma operator
    Sequence,
}

/// A binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// Left operand
    pub left: Box<Node>,
    /// Right operand
    pub right: Box<Node>,
}

/// A property access. `a.b` stores `b` as a String node.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAccess {
    /// The value being indexed
    pub object: Box<Node>,
    /// The property key expression
    pub property: Box<Node>,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubtractAssign,
    /// `*=`
    MultiplyAssign,
    /// `/=`
    DivideAssign,
    /// `%=`
    ModulusAssign,
    /// `<<=`
    LeftShiftAssign,
    /// `>>=`
    SignedRightShiftAssign,
    /// `>>>=`
    UnsignedRightShiftAssign,
    /// `&=`
    BitwiseAndAssign,
    /// `|=`
    BitwiseOrAssign,
    /// `^=`
    BitwiseXOrAssign,
}

impl AssignmentOperator {
    /// The binary operator a compound assignment applies, `None` for `=`.
    pub fn binary(self) -> Option<BinaryOperator> {
        let op = match self {
            AssignmentOperator::Assign => return None,
            AssignmentOperator::AddAssign => BinaryOperator::Add,
            AssignmentOperator::SubtractAssign => BinaryOperator::Subtract,
            AssignmentOperator::MultiplyAssign => BinaryOperator::Multiply,
            AssignmentOperator::DivideAssign => BinaryOperator::Divide,
            AssignmentOperator::ModulusAssign => BinaryOperator::Modulus,
            AssignmentOperator::LeftShiftAssign => BinaryOperator::LeftShift,
            AssignmentOperator::SignedRightShiftAssign => BinaryOperator::SignedRightShift,
            AssignmentOperator::UnsignedRightShiftAssign => BinaryOperator::UnsignedRightShift,
            AssignmentOperator::BitwiseAndAssign => BinaryOperator::BitwiseAnd,
            AssignmentOperator::BitwiseOrAssign => BinaryOperator::BitwiseOr,
            AssignmentOperator::BitwiseXOrAssign => BinaryOperator::BitwiseXOr,
        };
        Some(op)
    }
}

/// An assignment expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// The operator
    pub operator: AssignmentOperator,
    /// The target; an Identifier or PropertyAccess
    pub target: Box<Node>,
    /// The assigned value
    pub value: Box<Node>,
}

/// A conditional (ternary) expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    /// The condition
    pub test: Box<Node>,
    /// Evaluated when the condition is truthy
    pub consequent: Box<Node>,
    /// Evaluated otherwise
    pub alternate: Box<Node>,
}

/// A call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// The function being called
    pub callee: Box<Node>,
    /// The arguments, in source order
    pub arguments: Vec<Node>,
}

/// A function expression or declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    /// The function name; always present for declarations
    pub name: Option<String>,
    /// The parameters
    pub params: Vec<String>,
    /// The function body, shared with every closure created from it
    pub body: Rc<[Node]>,
}

/// A single variable declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// The name being declared
    pub name: String,
    /// Optional initializer expression
    pub init: Option<Node>,
}

/// An if statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The condition
    pub test: Box<Node>,
    /// The `then` branch
    pub consequent: Box<Node>,
    /// The `else` branch, if any
    pub alternate: Option<Box<Node>>,
}

/// A while or do-while loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// Loop condition
    pub test: Box<Node>,
    /// Loop body
    pub body: Box<Node>,
}

/// A for statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// Initializer: a VariableStatement or an expression
    pub init: Option<Box<Node>>,
    /// Condition; an absent test loops forever
    pub test: Option<Box<Node>>,
    /// Evaluated after each iteration
    pub update: Option<Box<Node>>,
    /// Loop body
    pub body: Box<Node>,
}

impl Node {
    /// Creates an identifier node.
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier(name.into())
    }

    /// Creates a string literal node.
    pub fn string(value: impl Into<String>) -> Self {
        Node::String(value.into())
    }

    /// Creates a unary expression node.
    pub fn unary(operator: UnaryOperator, argument: Node) -> Self {
        Node::Unary(UnaryExpression {
            operator,
            argument: Box::new(argument),
        })
    }

    /// Creates an update expression node.
    pub fn update(operator: UpdateOperator, argument: Node) -> Self {
        Node::Update(UpdateExpression {
            operator,
            argument: Box::new(argument),
        })
    }

    /// Creates a binary expression node.
    pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Node::Binary(BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Creates a property access node.
    pub fn property(object: Node, property: Node) -> Self {
        Node::PropertyAccess(PropertyAccess {
            object: Box::new(object),
            property: Box::new(property),
        })
    }

    /// Creates an assignment node.
    pub fn assignment(operator: AssignmentOperator, target: Node, value: Node) -> Self {
        Node::Assignment(AssignmentExpression {
            operator,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    /// Creates a conditional expression node.
    pub fn condition(test: Node, consequent: Node, alternate: Node) -> Self {
        Node::Condition(ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    /// Creates a call expression node.
    pub fn call(callee: Node, arguments: Vec<Node>) -> Self {
        Node::FunctionCall(CallExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    /// Returns true for nodes that can be assigned to.
    pub fn is_assignment_target(&self) -> bool {
        matches!(self, Node::Identifier(_) | Node::PropertyAccess(_))
    }
}
