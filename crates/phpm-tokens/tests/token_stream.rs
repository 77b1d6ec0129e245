use expect_test::{Expect, expect};
use phpm_errors::Error;
use phpm_testing::FixtureLexer;
use phpm_tokens::TokenKind::*;
use phpm_tokens::{Marker, Matcher, NewToken, StreamConfig, TokenStream};

fn load(code: &str) -> TokenStream {
    load_with(StreamConfig::default(), code)
}

fn load_with(config: StreamConfig, code: &str) -> TokenStream {
    let mut stream = TokenStream::with_config(config);
    stream.set_code(&FixtureLexer, code).unwrap();
    stream
}

fn unfiltered() -> StreamConfig {
    StreamConfig { ignore_whitespace: false, ignore_comments: false }
}

fn check_tokens(code: &str, expect: Expect) {
    let stream = load(code);
    let actual = stream.tokens().map(|token| token.to_string()).collect::<Vec<_>>().join("\n");
    expect.assert_eq(&actual);
}

fn window(stream: &TokenStream) -> [Option<String>; 3] {
    [
        stream.previous().map(|token| token.to_string()),
        stream.token().map(|token| token.to_string()),
        stream.next().map(|token| token.to_string()),
    ]
}

#[test]
fn open_tag_with_space() {
    check_tokens(
        "<?php ;",
        expect![[r#"
            MarkerToken(id = ^)
            PhpToken(T_OPEN_TAG, "<?php", 1)
            PhpToken(T_WHITESPACE, " ", 1)
            Literal(";", 1)
            MarkerToken(id = $)"#]],
    );
}

#[test]
fn open_tag_with_newlines() {
    check_tokens(
        "<?php\n\n;",
        expect![[r#"
            MarkerToken(id = ^)
            PhpToken(T_OPEN_TAG, "<?php", 1)
            PhpToken(T_WHITESPACE, "\n", 1)
            PhpToken(T_WHITESPACE, "\n", 2)
            Literal(";", 3)
            MarkerToken(id = $)"#]],
    );
}

#[test]
fn whitespace_is_split_per_line() {
    check_tokens(
        "<?php \n    \n    ",
        expect![[r#"
            MarkerToken(id = ^)
            PhpToken(T_OPEN_TAG, "<?php", 1)
            PhpToken(T_WHITESPACE, " \n", 1)
            PhpToken(T_WHITESPACE, "    \n", 2)
            PhpToken(T_WHITESPACE, "    ", 3)
            MarkerToken(id = $)"#]],
    );
}

#[test]
fn line_content() {
    let stream = load("<?php \n echo 'foobar';\n    exit;");

    assert_eq!(stream.line_content(1).unwrap(), "<?php \n");
    assert_eq!(stream.line_content(2).unwrap(), " echo 'foobar';\n");
    assert_eq!(stream.line_content(3).unwrap(), "    exit;");
    assert_eq!(stream.line_content(4), Err(Error::LineNotFound { line: 4 }));
}

#[test]
fn move_next_slides_the_window() {
    let mut stream = load_with(
        StreamConfig { ignore_whitespace: false, ..StreamConfig::default() },
        "<?php if ($a) { }",
    );

    let sequence = [
        "MarkerToken(id = ^)",
        r#"PhpToken(T_OPEN_TAG, "<?php", 1)"#,
        r#"PhpToken(T_WHITESPACE, " ", 1)"#,
        r#"PhpToken(T_IF, "if", 1)"#,
        r#"PhpToken(T_WHITESPACE, " ", 1)"#,
        r#"Literal("(", 1)"#,
        r#"PhpToken(T_VARIABLE, "$a", 1)"#,
        r#"Literal(")", 1)"#,
        r#"PhpToken(T_WHITESPACE, " ", 1)"#,
        r#"Literal("{", 1)"#,
        r#"PhpToken(T_WHITESPACE, " ", 1)"#,
        r#"Literal("}", 1)"#,
        "MarkerToken(id = $)",
    ]
    .map(String::from);

    let (mut previous, mut token) = (None, None);
    for next in sequence {
        assert_eq!(window(&stream), [previous.clone(), token.clone(), Some(next.clone())]);
        assert!(stream.move_next());
        previous = token;
        token = Some(next);
    }

    assert_eq!(window(&stream), [previous, token.clone(), None]);
    assert!(!stream.move_next());
    assert_eq!(window(&stream), [token, None, None]);
    assert!(!stream.move_next());
}

#[test]
fn skip_until() {
    let mut stream = load("<?php if ($foo === 'foo') { }");
    assert_eq!(window(&stream), [None, None, Some("MarkerToken(id = ^)".to_owned())]);

    stream.move_next();
    assert_eq!(stream.next().unwrap().to_string(), r#"PhpToken(T_OPEN_TAG, "<?php", 1)"#);

    assert!(stream.skip_until(&T_IF.into()));
    assert_eq!(stream.token().unwrap().to_string(), r#"PhpToken(T_IF, "if", 1)"#);

    assert!(stream.skip_until(&"{".into()));
    assert_eq!(stream.token().unwrap().to_string(), r#"Literal("{", 1)"#);

    assert!(!stream.skip_until(&T_CLASS.into()));
    assert!(stream.token().is_none());
}

#[test]
fn whitespace_helpers_return_only_whitespace() {
    for config in [StreamConfig::default(), unfiltered()] {
        let mut stream = load_with(config, "<?php \n  echo     'foobar';\n        exit;");
        while stream.move_next() {
            let token = stream.token().unwrap();
            if token.token().is_marker() {
                continue;
            }

            assert_eq!(token.indentation().unwrap().trim(), "", "{token}");
            assert_eq!(token.line_indentation().unwrap().trim(), "", "{token}");
            assert_eq!(token.whitespace_before().unwrap().trim(), "", "{token}");
            assert_eq!(token.whitespace_after().unwrap().trim(), "", "{token}");
        }
    }
}

#[test]
fn indentation_keeps_tabs_and_pads_with_spaces() {
    let stream = load_with(unfiltered(), "<?php\n\tfoo($a,\n\t    $b);");
    let find = |text: &str| stream.tokens().find(|token| token.content() == text).unwrap();

    assert_eq!(find("$a").line_indentation().unwrap(), "\t");
    assert_eq!(find("$a").start_column(), 5);
    assert_eq!(find("$a").indentation().unwrap(), "\t    ");
    assert_eq!(find("$b").indentation().unwrap(), "\t    ");

    assert_eq!(find(",").whitespace_after().unwrap(), "\n\t    ");
    assert_eq!(find("$b").whitespace_before().unwrap(), "\n\t    ");
    assert_eq!(find("foo").content_until(find(";")).unwrap(), "foo($a,\n\t    $b)");
    assert_eq!(find("foo").content_until_including(find(";")).unwrap(), "foo($a,\n\t    $b);");
    assert_eq!(find("(").content_between(find(",")).unwrap(), "$a");
    assert!(matches!(
        find(";").content_until(find("foo")),
        Err(Error::TokenNotFound { .. })
    ));
}

#[test]
fn content_ranges_include_the_requested_ends() {
    let stream = load("<?php foo(1);");
    let find = |text: &str| stream.tokens().find(|token| token.content() == text).unwrap();
    let (open, close) = (find("("), find(")"));

    assert_eq!(open.content_until(close).unwrap(), "(1");
    assert_eq!(open.content_until_including(close).unwrap(), "(1)");
    assert_eq!(open.content_between(close).unwrap(), "1");
    assert_eq!(open.content_between_including(close).unwrap(), "1)");
    assert!(matches!(
        close.content_between_including(open),
        Err(Error::TokenNotFound { .. })
    ));
}

#[test]
fn line_position_queries() {
    let stream = load("<?php\n$a = 1;\n$b;");
    let find = |text: &str| stream.tokens().find(|token| token.content() == text).unwrap();

    assert!(find("$a").is_first_on_line());
    assert!(!find("=").is_first_on_line());
    assert!(find(";").is_last_on_line());
    assert_eq!(find("1").first_on_line(), find("$a"));
    assert_eq!(find("$a").find_next(&Matcher::EndOfLine), Some(find(";")));
    assert_eq!(find("$a").tokens_until(&";".into()), Some(2));
    assert_eq!(find("$a").tokens_until(&T_CLASS.into()), None);
}

#[test]
fn closing_token_matches_nesting() {
    let mut stream = load("<?php { { } }");
    assert!(stream.skip_until(&"{".into()));

    let outer = *stream.sequence().iter().rev().find(|&&id| stream.get(id).content() == "}").unwrap();
    assert_eq!(stream.closing_token().unwrap().id(), outer);
    assert_eq!(stream.token().unwrap().content(), "{");

    stream.skip_current_block().unwrap();
    assert_eq!(stream.token().unwrap().id(), outer);
}

#[test]
fn curly_open_is_closed_by_a_brace() {
    let mut stream = load("<?php \"{$a['b']}\";");
    assert!(stream.skip_until(&T_CURLY_OPEN.into()));
    let closer = stream.closing_token().unwrap();
    assert_eq!(closer.content(), "}");
    assert!(closer.is_closing(stream.token().unwrap()));
}

#[test]
fn block_errors() {
    let mut stream = load("<?php foo(;");
    assert!(stream.skip_until(&T_STRING.into()));
    assert!(matches!(stream.closing_token(), Err(Error::NotABlockOpener { .. })));

    stream.move_next();
    let error = stream.skip_current_block().unwrap_err();
    let Error::UnclosedBlock { range, .. } = &error else { panic!("{error}") };
    let paren = stream.tokens().find(|token| token.content() == "(").unwrap();
    assert_eq!(*range, paren.range());
}

#[test]
fn skip_block_enters_and_skips() {
    let mut stream = load("<?php foo(bar()) ;");
    assert!(stream.skip_until(&T_STRING.into()));
    stream.skip_block().unwrap();
    assert_eq!(stream.next().unwrap().content(), ";");
}

#[test]
fn peek_looks_through_filtered_tokens() {
    let mut stream = load("<?php $a;");
    stream.move_next();

    let peeked: Vec<_> = std::iter::from_fn(|| stream.peek().map(|token| token.content().to_owned()))
        .take(3)
        .collect();
    assert_eq!(peeked, ["<?php", " ", "$a"]);

    stream.move_next();
    assert_eq!(stream.peek().unwrap().content(), "$a");
}

#[test]
fn matchers() {
    let stream = load("<?php foo($a, bar($b))->baz; \\Foo\\Bar::x();");
    let find = |text: &str| stream.tokens().find(|token| token.content() == text).unwrap();

    let open = find("(");
    let close = open.find_next(&Matcher::end_of_call()).unwrap();
    assert_eq!(close.next().unwrap().content(), "->");

    let name = find("\\");
    assert_eq!(name.find_next(&Matcher::EndOfName).unwrap().content(), "::");

    let start = stream.get(stream.sequence()[0]);
    assert!(start.matches(&Marker::StartOfFile.into()));
    assert!(!start.matches(&Marker::EndOfFile.into()));
    assert!(find("baz").matches(&!Matcher::from(T_VARIABLE)));
    assert_eq!((!Matcher::WhitespaceOrComment).to_string(), "NO_WHITESPACE_OR_COMMENT");

    let is_upper = Matcher::predicate(|token| token.content().starts_with(char::is_uppercase));
    assert_eq!(name.find_next(&is_upper).unwrap().content(), "Foo");
}

#[test]
fn fragments_get_an_open_tag() {
    let mut stream = TokenStream::new();
    stream.set_code_fragment(&FixtureLexer, "$a = 1;").unwrap();
    assert_eq!(stream.render(), "<?php $a = 1;");
    assert_eq!(stream.source(), "<?php $a = 1;");

    let mut stream = TokenStream::new();
    stream.set_code_fragment(&FixtureLexer, "<?php $a;").unwrap();
    assert_eq!(stream.to_string(), "<?php $a;");
}

#[test]
fn insertion_behind_the_cursor_is_not_revisited() {
    let mut stream = load("<?php\n$a;\n$b;");
    assert!(stream.skip_until(&T_VARIABLE.into()));
    assert!(stream.skip_until(&T_VARIABLE.into()));
    let b = stream.token().unwrap().id();

    let inserted = stream
        .insert_all_before(
            b,
            [NewToken::php(T_VARIABLE, "$c"), NewToken::literal(";"), NewToken::whitespace("\n")],
        )
        .unwrap();

    assert_eq!(inserted.len(), 3);
    assert_eq!(stream.render(), "<?php\n$a;\n$c;\n$b;");
    assert_eq!(stream.get(inserted[0]).line(), 3);
    assert_eq!(stream.get(b).line(), 4);
    assert_eq!(stream.get(b).previous().unwrap().id(), inserted[1]);
    assert_eq!(stream.token().unwrap().id(), b);

    let mut seen = Vec::new();
    while stream.move_next() {
        seen.push(stream.token().unwrap().to_string());
    }
    assert_eq!(seen, [r#"Literal(";", 4)"#, "MarkerToken(id = $)"]);
}

#[test]
fn insertion_ahead_of_the_cursor_is_visited() {
    let mut stream = load("<?php $a;");
    stream.move_next();
    let semicolon = stream.tokens().find(|token| token.content() == ";").unwrap().id();
    stream.insert_before(semicolon, NewToken::literal("+")).unwrap();
    stream.insert_before(semicolon, NewToken::php(T_LNUMBER, "1")).unwrap();

    let mut seen = Vec::new();
    while stream.move_next() {
        seen.push(stream.token().unwrap().content().to_owned());
    }
    assert_eq!(seen, ["<?php", "$a", "+", "1", ";", ""]);
}

#[test]
fn insertion_with_a_foreign_anchor_fails() {
    let mut small = load("<?php ;");
    let big = load("<?php $a = 1 + 2 + 3 + 4;");
    let foreign = *big.sequence().last().unwrap();

    let error = small.insert_before(foreign, NewToken::literal(";")).unwrap_err();
    assert!(matches!(error, Error::TokenNotFound { .. }));
    assert!(error.to_string().starts_with("could not find UnknownToken(#"), "{error}");
    assert_eq!(small.render(), "<?php ;");
    assert_eq!(big.describe(foreign), "MarkerToken(id = $)");
}

mod properties {
    use phpm_testing::FixtureLexer;
    use phpm_tokens::{NewToken, TokenStream};
    use proptest::prelude::*;
    use proptest::sample::{Index, select};

    fn source() -> impl Strategy<Value = String> {
        let pieces = vec![
            "$a", " ", "\n", "\t", ";", "=", "1", "2.5", "foo", "(", ")", "'s'", "\"x\"", "// c\n",
            "/* x */", "{", "}", "->",
        ];
        prop::collection::vec(select(pieces), 0..40)
            .prop_map(|pieces| format!("<?php {}", pieces.concat()))
    }

    proptest! {
        #[test]
        fn rendering_round_trips(code in source()) {
            let mut stream = TokenStream::new();
            stream.set_code(&FixtureLexer, &code).unwrap();

            prop_assert_eq!(stream.render(), code.clone());
            for token in stream.tokens() {
                let range = token.range().unwrap();
                prop_assert_eq!(&code[range], token.content());

                let newlines_before = code[..usize::from(range.start())].matches('\n').count() as u32;
                prop_assert_eq!(token.line(), newlines_before + 1);
            }
        }

        #[test]
        fn insertion_shifts_lines_from_the_anchor(code in source(), index in any::<Index>()) {
            let mut stream = TokenStream::new();
            stream.set_code(&FixtureLexer, &code).unwrap();

            let sequence = stream.sequence().to_vec();
            let anchor_position = 1 + index.index(sequence.len() - 1);
            let anchor = sequence[anchor_position];
            let lines: Vec<u32> = sequence.iter().map(|&id| stream.get(id).line()).collect();

            stream.insert_before(anchor, NewToken::whitespace("\n\n")).unwrap();

            for (position, &id) in sequence.iter().enumerate() {
                let expected = if position < anchor_position { lines[position] } else { lines[position] + 2 };
                prop_assert_eq!(stream.get(id).line(), expected);
            }

            let positions: Vec<usize> = stream.tokens().map(|token| token.position()).collect();
            prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
