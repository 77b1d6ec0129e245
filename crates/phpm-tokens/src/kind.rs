/// Lexer token kinds, named after the tags PHP's own tokenizer reports.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum TokenKind {
    T_OPEN_TAG,
    T_OPEN_TAG_WITH_ECHO,
    T_CLOSE_TAG,
    T_INLINE_HTML,
    T_WHITESPACE,
    T_COMMENT,
    T_DOC_COMMENT,

    T_VARIABLE,
    T_STRING,
    T_STRING_VARNAME,
    T_NS_SEPARATOR,
    T_LNUMBER,
    T_DNUMBER,
    T_NUM_STRING,
    T_CONSTANT_ENCAPSED_STRING,
    T_ENCAPSED_AND_WHITESPACE,
    T_START_HEREDOC,
    T_END_HEREDOC,
    T_CURLY_OPEN,
    T_DOLLAR_OPEN_CURLY_BRACES,

    T_ABSTRACT,
    T_ARRAY,
    T_AS,
    T_BREAK,
    T_CALLABLE,
    T_CASE,
    T_CATCH,
    T_CLASS,
    T_CLONE,
    T_CONST,
    T_CONTINUE,
    T_DECLARE,
    T_DEFAULT,
    T_DO,
    T_ECHO,
    T_ELSE,
    T_ELSEIF,
    T_EMPTY,
    T_ENDDECLARE,
    T_ENDFOR,
    T_ENDFOREACH,
    T_ENDIF,
    T_ENDSWITCH,
    T_ENDWHILE,
    T_EVAL,
    T_EXIT,
    T_EXTENDS,
    T_FINAL,
    T_FINALLY,
    T_FOR,
    T_FOREACH,
    T_FUNCTION,
    T_GLOBAL,
    T_GOTO,
    T_HALT_COMPILER,
    T_IF,
    T_IMPLEMENTS,
    T_INCLUDE,
    T_INCLUDE_ONCE,
    T_INSTANCEOF,
    T_INSTEADOF,
    T_INTERFACE,
    T_ISSET,
    T_LIST,
    T_NAMESPACE,
    T_NEW,
    T_PRINT,
    T_PRIVATE,
    T_PROTECTED,
    T_PUBLIC,
    T_REQUIRE,
    T_REQUIRE_ONCE,
    T_RETURN,
    T_STATIC,
    T_SWITCH,
    T_THROW,
    T_TRAIT,
    T_TRY,
    T_UNSET,
    T_USE,
    T_VAR,
    T_WHILE,
    T_YIELD,

    T_CLASS_C,
    T_DIR,
    T_FILE,
    T_FUNC_C,
    T_LINE,
    T_METHOD_C,
    T_NS_C,
    T_TRAIT_C,

    T_ARRAY_CAST,
    T_BOOL_CAST,
    T_DOUBLE_CAST,
    T_INT_CAST,
    T_OBJECT_CAST,
    T_STRING_CAST,
    T_UNSET_CAST,

    T_AND_EQUAL,
    T_BOOLEAN_AND,
    T_BOOLEAN_OR,
    T_COALESCE,
    T_CONCAT_EQUAL,
    T_DEC,
    T_DIV_EQUAL,
    T_DOUBLE_ARROW,
    T_DOUBLE_COLON,
    T_ELLIPSIS,
    T_INC,
    T_IS_EQUAL,
    T_IS_GREATER_OR_EQUAL,
    T_IS_IDENTICAL,
    T_IS_NOT_EQUAL,
    T_IS_NOT_IDENTICAL,
    T_IS_SMALLER_OR_EQUAL,
    T_LOGICAL_AND,
    T_LOGICAL_OR,
    T_LOGICAL_XOR,
    T_MINUS_EQUAL,
    T_MOD_EQUAL,
    T_MUL_EQUAL,
    T_OBJECT_OPERATOR,
    T_OR_EQUAL,
    T_PLUS_EQUAL,
    T_POW,
    T_POW_EQUAL,
    T_SL,
    T_SL_EQUAL,
    T_SPACESHIP,
    T_SR,
    T_SR_EQUAL,
    T_XOR_EQUAL,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::T_WHITESPACE | Self::T_COMMENT | Self::T_DOC_COMMENT)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::T_COMMENT | Self::T_DOC_COMMENT)
    }

    /// Kinds whose trailing whitespace is part of the value and must never be
    /// moved onto a separate whitespace token.
    pub(crate) fn keeps_trailing_whitespace(self) -> bool {
        matches!(self, Self::T_WHITESPACE | Self::T_ENCAPSED_AND_WHITESPACE | Self::T_INLINE_HTML)
    }
}
