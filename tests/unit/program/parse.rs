use super::*;

fn err_msg(tokens: &[&str]) -> String {
    parse_tokens(tokens).unwrap_err().to_string()
}

#[test]
fn parses_every_opcode() {
    let p = parse_tokens(&[
        "a", "+", "s", "-", "m", "*", "d", "/", "p", "^", "c", "C", "u", "w",
    ])
    .unwrap();
    let want = vec![
        Op::Binary(BinOp::Add),
        Op::Binary(BinOp::Add),
        Op::Binary(BinOp::Sub),
        Op::Binary(BinOp::Sub),
        Op::Binary(BinOp::Mul),
        Op::Binary(BinOp::Mul),
        Op::Binary(BinOp::Div),
        Op::Binary(BinOp::Div),
        Op::Binary(BinOp::Pow),
        Op::Binary(BinOp::Pow),
        Op::Clamp(ClampKind::Min),
        Op::Clamp(ClampKind::Max),
        Op::Duplicate,
        Op::Swap,
    ];
    assert_eq!(p.ops(), want.as_slice());
}

#[test]
fn parses_literals_with_exact_arity() {
    let mut toks = vec!["n", "-1.5", "v", "0.5", "0.5", "0.5", "1", "x"];
    let m: Vec<String> = (0..16).map(|i| i.to_string()).collect();
    toks.extend(m.iter().map(String::as_str));
    toks.extend(["i", "in/a.png", "o", "out.png"]);

    let p = parse_tokens(&toks).unwrap();
    assert_eq!(p.len(), 5);
    assert_eq!(p.ops()[0], Op::PushScalar(-1.5));
    assert_eq!(p.ops()[1], Op::PushVector(Vec4::new(0.5, 0.5, 0.5, 1.0)));
    let Op::PushMatrix(mat) = &p.ops()[2] else {
        panic!("expected matrix, got {:?}", p.ops()[2]);
    };
    assert_eq!(mat.at(0, 1), 1.0);
    assert_eq!(mat.at(3, 3), 15.0);
    assert_eq!(p.ops()[3], Op::Load(PathBuf::from("in/a.png")));
    assert_eq!(p.ops()[4], Op::Store(PathBuf::from("out.png")));
}

#[test]
fn hyphen_tokens_are_numbers_after_literal_opcodes() {
    let p = parse_tokens(&["n", "-", "-"]);
    assert!(p.is_err());

    let p = parse_tokens(&["n", "-2", "-"]).unwrap();
    assert_eq!(p.ops(), &[Op::PushScalar(-2.0), Op::Binary(BinOp::Sub)]);
}

#[test]
fn vector_needs_four_contiguous_numbers() {
    let msg = err_msg(&[
        "i", "a.png", "n", "0.5", "n", "0.5", "n", "0.5", "n", "0.5", "v", "m", "o", "out.png",
    ]);
    assert!(msg.starts_with("program error:"), "{msg}");
    assert!(msg.contains("token 11"), "{msg}");
    assert!(msg.contains("'m'"), "{msg}");
}

#[test]
fn truncated_literals_are_rejected() {
    assert!(err_msg(&["v", "1", "2", "3"]).contains("program ended"));
    assert!(err_msg(&["x", "1"]).contains("program ended"));
    assert!(err_msg(&["n"]).contains("'n' expects a number"));
    assert!(err_msg(&["i"]).contains("'i' expects a path"));
    assert!(err_msg(&["u", "o"]).contains("'o' expects a path"));
}

#[test]
fn unknown_and_multi_char_opcodes_are_rejected() {
    let msg = err_msg(&["n", "1", "q"]);
    assert!(msg.contains("token 2: unknown command 'q'"), "{msg}");

    let msg = err_msg(&["add"]);
    assert!(msg.contains("single-character opcode"), "{msg}");

    let msg = err_msg(&[""]);
    assert!(msg.contains("token 0"), "{msg}");
}

#[test]
fn script_comments_and_whitespace() {
    let src = "# halve an image\ni a.png   # load\nv 0.5 0.5\n  0.5 0.5\nm\no out.png\n";
    assert_eq!(
        tokenize_script(src),
        vec!["i", "a.png", "v", "0.5", "0.5", "0.5", "0.5", "m", "o", "out.png"]
    );
    let p = Program::from_script(src).unwrap();
    assert_eq!(p.len(), 4);
}

#[test]
fn display_round_trips_through_parser() {
    let p = parse_tokens(&[
        "n", "2", "v", "1", "0.25", "-3", "0", "+", "i", "a.png", "u", "w", "C", "^", "o", "b.png",
    ])
    .unwrap();
    let text = p.to_string();
    assert_eq!(text, "n 2 v 1 0.25 -3 0 a i a.png u w C p o b.png");
    assert_eq!(Program::from_script(&text).unwrap(), p);
}

#[test]
fn from_path_reports_missing_script() {
    let err = Program::from_path("target/definitely/missing.imgop").unwrap_err();
    assert!(err.to_string().contains("read script"));
}

#[test]
fn hash_inside_a_token_is_not_a_comment() {
    let src = "i img#1.png #load\n# whole line\no out#2.png";
    assert_eq!(
        tokenize_script(src),
        vec!["i", "img#1.png", "o", "out#2.png"]
    );

    let p = parse_tokens(&["i", "a#b.png", "u", "o", "c#d.png"]).unwrap();
    assert_eq!(Program::from_script(&p.to_string()).unwrap(), p);
}
