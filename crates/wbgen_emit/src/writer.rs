//! Line-oriented text builder shared by the emitters.

/// Accumulates output one line at a time with a fixed indent unit.
#[derive(Debug, Default)]
pub(crate) struct CodeWriter {
    out: String,
}

const INDENT: &str = "    ";

impl CodeWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `text` at `depth` indent levels, followed by a newline.
    pub(crate) fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Appends `items` one per line at `depth`, comma-separated.
    pub(crate) fn comma_list<I, S>(&mut self, depth: usize, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items = items.into_iter().peekable();
        while let Some(item) = items.next() {
            if items.peek().is_some() {
                self.line(depth, format!("{},", item.as_ref()));
            } else {
                self.line(depth, item);
            }
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indented_lines() {
        let mut w = CodeWriter::new();
        w.line(0, "module m;");
        w.line(1, "wire a;");
        w.blank();
        w.line(0, "endmodule");
        assert_eq!(w.finish(), "module m;\n    wire a;\n\nendmodule\n");
    }

    #[test]
    fn comma_list_omits_last_comma() {
        let mut w = CodeWriter::new();
        w.comma_list(2, [".a(x)", ".b(y)", ".c(z)"]);
        assert_eq!(
            w.finish(),
            "        .a(x),\n        .b(y),\n        .c(z)\n"
        );
    }

    #[test]
    fn comma_list_empty() {
        let mut w = CodeWriter::new();
        w.comma_list(1, Vec::<String>::new());
        assert_eq!(w.finish(), "");
    }
}
