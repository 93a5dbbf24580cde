//! Printing primitive values to a byte sink.

use std::io::{self, Write};

use crate::format::{bool_text, float_text};
use crate::value::Value;

/// Separator written between values on one line.
pub const SEPARATOR: &[u8] = b" ";

/// Terminator written after the last value on a line.
pub const LINE_END: &[u8] = b"\n";

/// Writes canonical value text to `W`.
///
/// The printer adds no buffering or separators of its own: every call
/// writes exactly the bytes of one value, one separator, or one line end.
/// Callers that need the output visible immediately call [`Printer::flush`].
#[derive(Debug)]
pub struct Printer<W> {
    out: W,
}

impl<W: Write> Printer<W> {
    /// Wrap a sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// The wrapped sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print an integer in decimal.
    pub fn print_int(&mut self, value: i64) -> io::Result<()> {
        write!(self.out, "{value}")
    }

    /// Print `true` or `false`.
    pub fn print_bool(&mut self, value: bool) -> io::Result<()> {
        self.out.write_all(bool_text(value).as_bytes())
    }

    /// Print a float in canonical form.
    pub fn print_float(&mut self, value: f64) -> io::Result<()> {
        self.out.write_all(float_text(value).as_bytes())
    }

    /// Print any primitive.
    pub fn print(&mut self, value: Value) -> io::Result<()> {
        match value {
            Value::Int(v) => self.print_int(v),
            Value::Bool(v) => self.print_bool(v),
            Value::Float(v) => self.print_float(v),
        }
    }

    /// Print the value separator.
    pub fn sep(&mut self) -> io::Result<()> {
        self.out.write_all(SEPARATOR)
    }

    /// Print the line terminator.
    pub fn end(&mut self) -> io::Result<()> {
        self.out.write_all(LINE_END)
    }

    /// Print `values` separated by single spaces, then end the line.
    ///
    /// An empty slice prints just the line end.
    pub fn print_line(&mut self, values: &[Value]) -> io::Result<()> {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.sep()?;
            }
            self.print(*value)?;
        }
        self.end()
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(f: impl FnOnce(&mut Printer<Vec<u8>>) -> io::Result<()>) -> String {
        let mut p = Printer::new(Vec::new());
        f(&mut p).unwrap();
        String::from_utf8(p.into_inner()).unwrap()
    }

    #[test]
    fn primitives_write_no_separators() {
        assert_eq!(printed(|p| p.print_int(42)), "42");
        assert_eq!(printed(|p| p.print_bool(false)), "false");
        assert_eq!(printed(|p| p.print_float(3.0)), "3.00000000000000000");
        assert_eq!(printed(|p| p.sep()), " ");
        assert_eq!(printed(|p| p.end()), "\n");
    }

    #[test]
    fn composed_line() {
        let out = printed(|p| {
            p.print_int(1)?;
            p.sep()?;
            p.print_bool(true)?;
            p.sep()?;
            p.print_float(-0.5)?;
            p.end()
        });
        assert_eq!(out, "1 true -0.50000000000000000\n");
    }

    #[test]
    fn print_line_matches_manual_composition() {
        let out = printed(|p| p.print_line(&[Value::Int(1), Value::Bool(true), Value::Float(-0.5)]));
        assert_eq!(out, "1 true -0.50000000000000000\n");
    }

    #[test]
    fn empty_line() {
        assert_eq!(printed(|p| p.print_line(&[])), "\n");
    }
}
