use std::io::Write;
use std::path::PathBuf;

use clap::{Arg, Command};
use numarray::{Broadcasting, DType, Kernel, KernelConfig, NumericArray, Scalar};
use numarray_cli::config::{load_eval_config, EvalConfig};
use numarray_cli::eval::{evaluate, write_output, Op, Output};
use numarray_cli::input::{load_input, parse_input, Input};
use serde_json::json;
use tempfile::NamedTempFile;

fn json_file(value: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file
}

fn flags() -> Command {
    Command::new("numarray")
        .arg(Arg::new("dtype").short('t').long("dtype"))
        .arg(
            Arg::new("precision")
                .short('p')
                .long("precision")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(Arg::new("broadcasting").short('b').long("broadcasting"))
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn partial_config_keeps_defaults() {
    let file = json_file(&json!({ "dtype": "int32", "kernel": { "broadcasting": "numpy" } }));
    let config = load_eval_config(file.path()).unwrap();
    assert_eq!(config.dtype, DType::Int32);
    assert_eq!(config.kernel.broadcasting, Broadcasting::Numpy);
    assert_eq!(
        config.kernel.singular_tolerance,
        KernelConfig::default().singular_tolerance
    );
    assert_eq!(config.precision, None);
}

#[test]
fn unreadable_config_names_the_file() {
    let err = load_eval_config("/nonexistent/numarray.json").unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/numarray.json"));

    let file = json_file(&json!({ "dtype": "complex128" }));
    assert!(load_eval_config(file.path()).is_err());
}

#[test]
fn flags_override_config_file() {
    let file = json_file(&json!({ "dtype": "int32", "precision": 1 }));
    let matches = flags().get_matches_from(["numarray", "-t", "float32", "-p", "4", "-b", "numpy"]);
    let config = EvalConfig::from_arguments(Some(file.path()), &matches).unwrap();
    assert_eq!(config.dtype, DType::Float32);
    assert_eq!(config.precision, Some(4));
    assert_eq!(config.kernel.broadcasting, Broadcasting::Numpy);

    let matches = flags().get_matches_from(["numarray"]);
    assert_eq!(EvalConfig::from_arguments(None, &matches).unwrap(), EvalConfig::default());
}

// ---------------------------------------------------------------------------
// operand files
// ---------------------------------------------------------------------------

#[test]
fn nested_list_uses_default_dtype() {
    let file = json_file(&json!([[1, 2], [3, 4]]));
    let input = load_input(file.path(), DType::Int64).unwrap();
    let expected = NumericArray::from_values([[1, 2], [3, 4]], DType::Int64).unwrap();
    assert_eq!(input, Input::Array(expected));
}

#[test]
fn object_with_shape_and_flat_values() {
    let input = parse_input(
        &json!({ "shape": [2, 3], "dtype": "float32", "values": [1, 2, 3, 4, 5, 6] }),
        DType::Float64,
    )
    .unwrap()
    .into_array()
    .unwrap();
    assert_eq!(input.shape(), &[2, 3]);
    assert_eq!(input.dtype(), DType::Float32);
    assert_eq!(input.get(&[1, 0]).unwrap(), Scalar::Float(4.0));
}

#[test]
fn object_shape_must_fit_values() {
    let result = parse_input(&json!({ "shape": [2, 2], "values": [1, 2, 3] }), DType::Float64);
    assert!(result.is_err());
    assert!(parse_input(&json!({ "shape": [2] }), DType::Float64).is_err());
}

#[test]
fn number_is_a_scalar_operand() {
    assert_eq!(
        parse_input(&json!(2.5), DType::Int32).unwrap(),
        Input::Scalar(Scalar::Float(2.5))
    );
    let rank0 = Input::Scalar(Scalar::Int(3)).into_array().unwrap();
    assert_eq!(rank0.ndim(), 0);
    assert_eq!(rank0.item().unwrap(), Scalar::Int(3));
}

#[test]
fn non_numeric_operands_are_rejected() {
    assert!(parse_input(&json!(["a", "b"]), DType::Float64).is_err());
    assert!(parse_input(&json!(null), DType::Float64).is_err());

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[[1, 2]").unwrap();
    let err = load_input(file.path(), DType::Float64).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse operand"));
}

// ---------------------------------------------------------------------------
// evaluate
// ---------------------------------------------------------------------------

#[test]
fn op_names_parse() {
    for op in Op::ALL {
        assert_eq!(op.name().parse::<Op>().unwrap(), op);
    }
    assert!("power".parse::<Op>().is_err());
}

#[test]
fn evaluate_sum_of_two_matrices() {
    let a = NumericArray::from_values([[1.0, 2.0], [3.0, 4.0]], DType::Float64).unwrap();
    let b = Input::Array(NumericArray::from_values([[5.0, 6.0], [7.0, 8.0]], DType::Float64).unwrap());
    let output = evaluate(&Kernel::default(), Op::Add, &a, Some(&b)).unwrap();
    let expected = NumericArray::from_values([[6.0, 8.0], [10.0, 12.0]], DType::Float64).unwrap();
    assert_eq!(output, Output::Array(expected));
}

#[test]
fn evaluate_scalar_right_operand() {
    let a = NumericArray::from_values(vec![1, 2, 3], DType::Int32).unwrap();
    let two = Input::Scalar(Scalar::Int(2));
    match evaluate(&Kernel::default(), Op::Multiply, &a, Some(&two)).unwrap() {
        Output::Array(out) => {
            assert_eq!(out.dtype(), DType::Int32);
            assert_eq!(out.to_vec_f64(), vec![2.0, 4.0, 6.0]);
        }
        other => panic!("expected an array, got {:?}", other),
    }
    assert!(evaluate(&Kernel::default(), Op::Matmul, &a, Some(&two)).is_err());
    assert!(evaluate(&Kernel::default(), Op::Solve, &a, Some(&two)).is_err());
}

#[test]
fn evaluate_checks_arity() {
    let a = NumericArray::identity(2, DType::Float64);
    assert!(evaluate(&Kernel::default(), Op::Add, &a, None).is_err());
    let b = Input::Array(a.clone());
    assert!(evaluate(&Kernel::default(), Op::Transpose, &a, Some(&b)).is_err());
}

#[test]
fn evaluate_determinant_is_scalar() {
    let a = NumericArray::from_values([[1.0, 2.0], [3.0, 4.0]], DType::Float64).unwrap();
    match evaluate(&Kernel::default(), Op::Determinant, &a, None).unwrap() {
        Output::Scalar(Scalar::Float(det)) => assert!((det + 2.0).abs() < 1e-12),
        other => panic!("expected a float scalar, got {:?}", other),
    }
}

#[test]
fn evaluate_uses_kernel_broadcasting() {
    let a = NumericArray::ones(&[2, 3], DType::Float64);
    let row = Input::Array(NumericArray::from_values(vec![1.0, 2.0, 3.0], DType::Float64).unwrap());
    assert!(evaluate(&Kernel::default(), Op::Add, &a, Some(&row)).is_err());
    let numpy = Kernel::new(KernelConfig::new(Broadcasting::Numpy));
    let out = evaluate(&numpy, Op::Add, &a, Some(&row)).unwrap();
    match out {
        Output::Array(sum) => assert_eq!(sum.to_vec_f64(), vec![2.0, 3.0, 4.0, 2.0, 3.0, 4.0]),
        other => panic!("expected an array, got {:?}", other),
    }
}

#[test]
fn evaluate_singular_inverse_fails() {
    let a = NumericArray::from_values([[1.0, 2.0], [2.0, 4.0]], DType::Float64).unwrap();
    let err = evaluate(&Kernel::default(), Op::Inverse, &a, None).unwrap_err();
    assert!(err.to_string().contains("singular"));
}

// ---------------------------------------------------------------------------
// output
// ---------------------------------------------------------------------------

#[test]
fn render_honors_precision() {
    let out = Output::Scalar(Scalar::Float(2.0 / 3.0));
    assert_eq!(out.render(Some(3)), "0.667");
    let arr = Output::Array(NumericArray::from_values(vec![0.5], DType::Float64).unwrap());
    assert_eq!(arr.render(Some(2)), "[0.50]");
}

#[test]
fn written_output_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("result.json");
    let a = NumericArray::from_values([[1, 2], [3, 4]], DType::Int32).unwrap();
    write_output(&path, &Output::Array(a.clone())).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({ "shape": [2, 2], "dtype": "int32", "values": [[1, 2], [3, 4]] })
    );
    assert_eq!(load_input(&path, DType::Float64).unwrap(), Input::Array(a));
}

#[test]
fn non_finite_values_are_counted_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotient.json");
    let a = NumericArray::from_values(vec![1.0, 0.0, 4.0], DType::Float64).unwrap();
    let zeros = NumericArray::from_values(vec![0.0, 0.0, 2.0], DType::Float64).unwrap();
    let output = evaluate(&Kernel::default(), Op::Divide, &a, Some(&Input::Array(zeros))).unwrap();
    assert_eq!(output.non_finite_count(), 2);
    assert_eq!(Output::Scalar(Scalar::Float(1.5)).non_finite_count(), 0);

    write_output(&path, &output).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["values"], json!([null, null, 2.0]));
}
