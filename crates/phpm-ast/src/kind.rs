use std::fmt;

macro_rules! node_kinds {
    ($($kind:ident),* $(,)?) => {
        /// Node kinds of the PHP tree, named after PHP-Parser's node classes.
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            pub const ALL: &'static [Self] = &[$(Self::$kind,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$kind => stringify!($kind),)*
                }
            }
        }
    };
}

node_kinds! {
    // A statement list, the wrapper compound statements hold their bodies in.
    Block,

    Arg,
    Param,
    Name,
    FullyQualified,
    Relative,
    ConstElem,

    Array,
    ArrayDimFetch,
    ArrayItem,
    Assign,
    AssignBitwiseAnd,
    AssignBitwiseOr,
    AssignBitwiseXor,
    AssignConcat,
    AssignDiv,
    AssignList,
    AssignMinus,
    AssignMod,
    AssignMul,
    AssignPlus,
    AssignRef,
    AssignShiftLeft,
    AssignShiftRight,
    BitwiseAnd,
    BitwiseNot,
    BitwiseOr,
    BitwiseXor,
    BooleanAnd,
    BooleanNot,
    BooleanOr,
    Cast,
    ClassConstFetch,
    Clone,
    Closure,
    ClosureUse,
    Concat,
    ConstFetch,
    Div,
    Empty,
    Equal,
    ErrorSuppress,
    Eval,
    Exit,
    FuncCall,
    Greater,
    GreaterOrEqual,
    Identical,
    Include,
    Instanceof,
    Isset,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    MethodCall,
    Minus,
    Mod,
    Mul,
    New,
    NotEqual,
    NotIdentical,
    Plus,
    PostDec,
    PostInc,
    PreDec,
    PreInc,
    Print,
    PropertyFetch,
    ShellExec,
    ShiftLeft,
    ShiftRight,
    Smaller,
    SmallerOrEqual,
    StaticCall,
    StaticPropertyFetch,
    Ternary,
    UnaryMinus,
    UnaryPlus,
    Variable,
    Yield,

    DNumber,
    Encapsed,
    LNumber,
    MagicConst,
    String,

    Break,
    Case,
    Catch,
    Class,
    ClassConst,
    ClassMethod,
    Const,
    Continue,
    Declare,
    Do,
    Echo,
    Else,
    ElseIf,
    For,
    Foreach,
    Function,
    Global,
    Goto,
    HaltCompiler,
    If,
    InlineHtml,
    Interface,
    Label,
    Namespace,
    Property,
    PropertyProperty,
    Return,
    Static,
    StaticVar,
    Switch,
    Throw,
    Trait,
    TraitUse,
    TryCatch,
    Unset,
    Use,
    UseUse,
    While,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
