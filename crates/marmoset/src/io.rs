//! Output sinks for the `puts` builtin.
//!
//! The evaluator threads a [`PrintWriter`] through execution instead of
//! writing to stdout directly, so hosts can capture, discard, or redirect
//! program output. Tests use [`CollectStringPrint`].

use std::io::Write;

/// Receives one line of program output per call, without the trailing
/// newline.
pub trait PrintWriter {
    fn print(&mut self, text: &str);
}

/// Writes program output to stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn print(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Discards program output.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn print(&mut self, _text: &str) {}
}

/// Collects program output into a string, one line per `print` call.
#[derive(Debug, Default)]
pub struct CollectStringPrint {
    output: String,
}

impl CollectStringPrint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything printed so far.
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl PrintWriter for CollectStringPrint {
    fn print(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }
}

/// Adapts any `io::Write` into a [`PrintWriter`]. Write errors are
/// swallowed; program output is best-effort, like stdout itself.
#[derive(Debug)]
pub struct WritePrint<'a, W: Write>(pub &'a mut W);

impl<W: Write> PrintWriter for WritePrint<'_, W> {
    fn print(&mut self, text: &str) {
        let _ = writeln!(self.0, "{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_string_print_appends_lines() {
        let mut print = CollectStringPrint::new();
        print.print("one");
        print.print("two");
        assert_eq!(print.output(), "one\ntwo\n");
    }

    #[test]
    fn test_write_print_adapts_io_write() {
        let mut buffer = Vec::new();
        WritePrint(&mut buffer).print("hi");
        assert_eq!(buffer, b"hi\n");
    }
}
