//! Integration tests: printed text decodes back to the same value.

use std::io;

use bril_rt_core::ArgType;
use bril_rt_io::{float_text, parse_bool, parse_float, parse_int, parse_value, Printer, Value};
use bril_rt_test_utils::{FailingWriter, SharedBuf};
use proptest::prelude::*;

#[test]
fn a_program_line_through_a_shared_sink() {
    let sink = SharedBuf::new();
    let mut printer = Printer::new(sink.clone());
    printer.print_int(-3).unwrap();
    printer.sep().unwrap();
    printer.print_bool(false).unwrap();
    printer.sep().unwrap();
    printer.print_float(f64::INFINITY).unwrap();
    printer.end().unwrap();
    printer.print_line(&[Value::Float(0.25)]).unwrap();
    assert_eq!(
        sink.contents(),
        "-3 false Infinity\n0.25000000000000000\n"
    );
}

#[test]
fn write_failures_surface_as_errors() {
    let mut printer = Printer::new(FailingWriter(io::ErrorKind::BrokenPipe));
    assert_eq!(
        printer.print_int(1).unwrap_err().kind(),
        io::ErrorKind::BrokenPipe
    );
    assert!(printer.end().is_err());
    assert!(printer.print_line(&[Value::Bool(true)]).is_err());
}

#[test]
fn printed_tokens_parse_back() {
    let sink = SharedBuf::new();
    let mut printer = Printer::new(sink.clone());
    let values = [
        Value::Int(i64::MIN),
        Value::Bool(true),
        Value::Float(-2.75),
        Value::Float(f64::NEG_INFINITY),
    ];
    printer.print_line(&values).unwrap();

    let text = sink.contents();
    let mut argv = vec!["prog".to_string()];
    argv.extend(text.split_whitespace().map(str::to_string));

    for (i, value) in values.iter().enumerate() {
        let parsed = parse_value(&argv, i as i64 + 1, value.ty()).unwrap();
        assert_eq!(parsed, *value);
    }
}

proptest! {
    #[test]
    fn any_int_parses_back(v in any::<i64>()) {
        let args = ["prog".to_string(), v.to_string()];
        prop_assert_eq!(parse_int(&args, 1).unwrap(), v);
    }

    #[test]
    fn bool_parse_rejects_everything_else(s in "[a-zA-Z0-9 ]{0,8}") {
        prop_assume!(s != "true" && s != "false");
        prop_assert!(parse_bool(&[s.as_str()], 0).is_err());
    }

    // At least one integer digit plus seventeen fractional digits gives
    // the seventeen significant digits a double needs.
    #[test]
    fn moderate_floats_parse_back(v in -1e6f64..1e6) {
        prop_assume!(v.abs() >= 1.0);
        let text = float_text(v);
        prop_assert_eq!(parse_float(&[text.as_str()], 0).unwrap(), v);
    }

    #[test]
    fn out_of_range_indices_are_missing(index in 3i64..i64::MAX) {
        let args = ["prog", "1", "2"];
        prop_assert!(parse_value(&args, index, ArgType::Int).is_err());
    }
}
