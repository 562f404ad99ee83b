use super::*;
use crate::foundation::error::ImgOpError;
use crate::linalg::vec4::Vec4;
use crate::program::parse::parse_tokens;
use crate::raster::float_image::FloatImage;
use crate::raster::store::InMemoryImageStore;
use crate::stack::operand::OperandKind;

fn machine(store: InMemoryImageStore) -> Machine<InMemoryImageStore> {
    Machine::new(store, EvalOpts::default())
}

fn run(tokens: &[&str]) -> ImgOpResult<RunReport> {
    let program = parse_tokens(tokens)?;
    machine(InMemoryImageStore::new()).run(&program)
}

#[test]
fn scalar_sum_is_left_on_the_stack() {
    let report = run(&["n", "2.0", "n", "3.0", "a"]).unwrap();
    assert_eq!(report.executed, 3);
    assert_eq!(report.residual, vec![Operand::Scalar(5.0)]);
    assert!(report.discarded.is_empty());
}

#[test]
fn operand_order_is_deeper_then_top() {
    let report = run(&["n", "8", "n", "2", "d", "n", "1", "s"]).unwrap();
    assert_eq!(report.residual, vec![Operand::Scalar(3.0)]);

    let report = run(&["n", "8", "n", "2", "w", "d"]).unwrap();
    assert_eq!(report.residual, vec![Operand::Scalar(0.25)]);
}

#[test]
fn underflow_names_the_op_and_depth() {
    let err = run(&["n", "1", "a"]).unwrap_err();
    assert!(matches!(err, ImgOpError::StackUnderflow(_)));
    assert_eq!(
        err.to_string(),
        "stack underflow: op 1 (add) needs 2 operands, stack has 1"
    );

    let err = run(&["u"]).unwrap_err();
    assert!(err.to_string().contains("op 0 (duplicate) needs 1 operand"));

    let err = run(&["o", "out.png"]).unwrap_err();
    assert!(matches!(err, ImgOpError::StackUnderflow(_)));
}

#[test]
fn pop2_leaves_the_stack_intact_on_underflow() {
    let mut stack = OperandStack::new();
    stack.push(1.0_f32);
    assert!(stack.pop2("test").is_err());
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.peek(), Some(&Operand::Scalar(1.0)));
}

#[test]
fn duplicate_shares_the_image() {
    let mut store = InMemoryImageStore::new();
    store.insert("a.png", FloatImage::filled(2, 2, Vec4::splat(0.5)));
    let mut m = machine(store);

    m.step(0, &Op::Load("a.png".into())).unwrap();
    m.step(1, &Op::Duplicate).unwrap();

    let images: Vec<_> = m
        .stack()
        .iter()
        .map(|o| match o {
            Operand::Image(img) => img.clone(),
            other => panic!("expected image, got {:?}", other.kind()),
        })
        .collect();
    assert_eq!(images.len(), 2);
    assert!(std::sync::Arc::ptr_eq(&images[0], &images[1]));
}

#[test]
fn swap_exchanges_the_top_two() {
    let report = run(&["n", "1", "v", "0", "0", "0", "0", "w"]).unwrap();
    assert_eq!(
        report.residual.iter().map(Operand::kind).collect::<Vec<_>>(),
        vec![OperandKind::Vector, OperandKind::Scalar]
    );
}

#[test]
fn store_requires_an_image() {
    let err = run(&["n", "1", "o", "out.png"]).unwrap_err();
    assert!(matches!(err, ImgOpError::TypeMismatch(_)));
    assert_eq!(
        err.to_string(),
        "type mismatch: op 1: store expects an image, got scalar"
    );
}

#[test]
fn load_and_store_through_the_store() {
    let mut store = InMemoryImageStore::new();
    store.insert("in.png", FloatImage::filled(3, 2, Vec4::splat(1.0)));
    let mut m = machine(store);

    let program = parse_tokens(&["i", "in.png", "n", "0.5", "m", "o", "out.png"]).unwrap();
    let report = m.run(&program).unwrap();
    assert!(report.residual.is_empty());

    let store = m.into_store();
    assert_eq!(store.len(), 2);
    let out = store.get("out.png").unwrap();
    assert_eq!((out.width(), out.height()), (3, 2));
    assert_eq!(&out.to_rgba8()[..4], &[128u8; 4]);
}

#[test]
fn missing_input_is_an_io_error() {
    let err = run(&["i", "nope.png"]).unwrap_err();
    assert!(matches!(err, ImgOpError::Io(_)), "{err}");
}

#[test]
fn unsupported_pair_fails_by_default() {
    let err = run(&["n", "1", "v", "1", "1", "1", "1", "a"]).unwrap_err();
    assert!(matches!(err, ImgOpError::UnsupportedOperands(_)));
    assert_eq!(
        err.to_string(),
        "unsupported operands: op 2: add of scalar and vector"
    );
}

#[test]
fn discard_policy_drops_the_pair_and_continues() {
    let opts = EvalOpts {
        unsupported: UnsupportedPolicy::Discard,
    };
    let mut m = Machine::new(InMemoryImageStore::new(), opts);
    let program = parse_tokens(&["n", "7", "n", "1", "v", "1", "1", "1", "1", "a"]).unwrap();
    let report = m.run(&program).unwrap();

    assert_eq!(report.residual, vec![Operand::Scalar(7.0)]);
    assert_eq!(report.discarded.len(), 1);
    assert_eq!(report.discarded[0].index, 3);
    assert_eq!(report.discarded[0].pair.o1, OperandKind::Scalar);
    assert_eq!(report.discarded[0].pair.o2, OperandKind::Vector);
}

#[test]
fn clamp_on_wrong_kinds_fails_even_when_lenient() {
    let opts = EvalOpts {
        unsupported: UnsupportedPolicy::Discard,
    };
    let mut m = Machine::new(InMemoryImageStore::new(), opts);
    let program = parse_tokens(&["n", "1", "n", "2", "c"]).unwrap();
    let err = m.run(&program).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported operands: op 2: clamp_min of scalar and scalar"
    );
}

#[test]
fn summary_serializes_without_pixels() {
    let mut store = InMemoryImageStore::new();
    store.insert("a.png", FloatImage::filled(4, 3, Vec4::splat(0.0)));
    let mut m = Machine::new(
        store,
        EvalOpts {
            unsupported: UnsupportedPolicy::Discard,
        },
    );
    let program = parse_tokens(&[
        "i", "a.png", "n", "2", "n", "0", "v", "1", "1", "1", "1", "p", "n", "1",
    ])
    .unwrap();
    let summary = m.run(&program).unwrap().summary();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["executed"], 6);
    assert_eq!(json["residual"][0]["kind"], "image");
    assert_eq!(json["residual"][0]["width"], 4);
    assert_eq!(json["residual"][1]["kind"], "scalar");
    assert_eq!(json["residual"][2]["kind"], "scalar");
    assert_eq!(json["discarded"][0]["index"], 4);
    assert_eq!(json["discarded"][0]["op"], "pow");
    assert_eq!(json["discarded"][0]["o2"], "vector");
}

#[test]
fn failed_run_does_not_leak_into_the_next() {
    let opts = EvalOpts {
        unsupported: UnsupportedPolicy::Discard,
    };
    let mut m = Machine::new(InMemoryImageStore::new(), opts);

    let bad = parse_tokens(&[
        "n", "1", "v", "1", "1", "1", "1", "a", "n", "7", "n", "3", "o", "x.png",
    ])
    .unwrap();
    let err = m.run(&bad).unwrap_err();
    assert!(matches!(err, ImgOpError::TypeMismatch(_)));
    assert_eq!(m.stack().len(), 1);

    let err = m.run(&parse_tokens(&["n", "2", "a"]).unwrap()).unwrap_err();
    assert!(matches!(err, ImgOpError::StackUnderflow(_)));

    let report = m.run(&parse_tokens(&["n", "2"]).unwrap()).unwrap();
    assert_eq!(report.residual, vec![Operand::Scalar(2.0)]);
    assert!(report.discarded.is_empty());
}
