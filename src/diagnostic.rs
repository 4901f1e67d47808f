use owo_colors::OwoColorize;
use std::fmt;

/// A half-open range of byte offsets into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`.
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A label pointing to a specific span in the source
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A fatal error prepared for presentation.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Span of the first label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.first().map(|label| label.span)
    }

    /// Machine-readable form: `{code, message, start, end, line, column}`.
    pub fn to_json(&self, source: &str) -> serde_json::Value {
        let span = self.primary_span().unwrap_or_default();
        let (line, column) = line_col(source, span.start);
        serde_json::json!({
            "code": self.code,
            "message": self.message,
            "start": span.start,
            "end": span.end,
            "line": line,
            "column": column,
        })
    }
}

/// Computes 1-based line and column from a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_content(source: &str, line_num: usize) -> Option<&str> {
    source.split('\n').nth(line_num - 1)
}

/// Diagnostic renderer for Rust-like error output
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let header = match &diagnostic.code {
            Some(code) => format!("error[{}]", code),
            None => "error".to_string(),
        };
        output.push_str(&format!(
            "{}: {}\n",
            self.style_red_bold(&header),
            self.style_bold(&diagnostic.message)
        ));

        let mut lines_to_show: Vec<usize> = Vec::new();
        for label in &diagnostic.labels {
            let (start_line, _) = line_col(self.source, label.span.start);
            let (end_line, _) = line_col(self.source, self.last_offset(label.span));
            for line in start_line..=end_line {
                if !lines_to_show.contains(&line) {
                    lines_to_show.push(line);
                }
            }
        }
        lines_to_show.sort_unstable();

        if let Some(label) = diagnostic.labels.first() {
            let (line, col) = line_col(self.source, label.span.start);
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.style_blue("-->"),
                self.file_name,
                line,
                col
            ));

            let max_line = lines_to_show.last().copied().unwrap_or(1);
            let width = max_line.to_string().len();

            output.push_str(&format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|")));
            for &line_num in &lines_to_show {
                self.render_line(&mut output, diagnostic, line_num, width);
            }
            output.push_str(&format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|")));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.style_blue("="), note));
        }

        output
    }

    fn last_offset(&self, span: Span) -> usize {
        span.end.saturating_sub(1).max(span.start)
    }

    fn render_line(&self, output: &mut String, diagnostic: &Diagnostic, line_num: usize, width: usize) {
        let Some(content) = line_content(self.source, line_num) else {
            return;
        };

        output.push_str(&format!(
            "{:>width$} {} {}\n",
            self.style_blue(&line_num.to_string()),
            self.style_blue("|"),
            content,
            width = width + 1
        ));

        let line_chars = content.chars().count();
        let mut underlines: Vec<(usize, usize, &str)> = Vec::new();
        for label in &diagnostic.labels {
            let (first_line, start_col) = line_col(self.source, label.span.start);
            let (last_line, end_col) = line_col(self.source, self.last_offset(label.span));

            if first_line <= line_num && last_line >= line_num {
                let col_start = if first_line == line_num { start_col } else { 1 };
                let col_end = if last_line == line_num {
                    end_col + 1
                } else {
                    line_chars + 1
                };
                underlines.push((col_start, col_end, &label.message));
            }
        }

        if underlines.is_empty() {
            return;
        }
        underlines.sort_by_key(|(start, _, _)| *start);

        let mut underline = String::new();
        let mut pos = 1;
        for (col_start, col_end, _) in &underlines {
            while pos < *col_start {
                underline.push(' ');
                pos += 1;
            }
            while pos < *col_end {
                underline.push('^');
                pos += 1;
            }
        }

        output.push_str(&format!(
            "{} {} {}\n",
            " ".repeat(width + 1),
            self.style_blue("|"),
            self.style_red(&underline)
        ));

        for (col_start, _, message) in &underlines {
            if !message.is_empty() {
                output.push_str(&format!(
                    "{} {} {}{}\n",
                    " ".repeat(width + 1),
                    self.style_blue("|"),
                    " ".repeat(col_start.saturating_sub(1)),
                    self.style_red(message)
                ));
            }
        }
    }

    fn style_red(&self, s: &str) -> String {
        if self.use_color {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }

    fn style_red_bold(&self, s: &str) -> String {
        if self.use_color {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn style_blue(&self, s: &str) -> String {
        if self.use_color {
            s.blue().to_string()
        } else {
            s.to_string()
        }
    }

    fn style_bold(&self, s: &str) -> String {
        if self.use_color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }
}

/// Render multiple diagnostics followed by an abort summary.
pub fn render_diagnostics(source: &str, file_name: &str, diagnostics: &[Diagnostic], use_color: bool) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let count = diagnostics.len();
    if count > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            count,
            if count == 1 { "" } else { "s" }
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "x ← 5\ny ← 10";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 2), (1, 3));
        // `←` is three bytes but one column
        assert_eq!(line_col(source, 6), (1, 5));
        assert_eq!(line_col(source, 8), (2, 1));
    }

    #[test]
    fn test_span_merge() {
        let merged = Span::new(5, 10).merge(Span::new(8, 15));
        assert_eq!(merged, Span::new(5, 15));
        assert_eq!(merged.len(), 10);
    }

    #[test]
    fn test_diagnostic_rendering() {
        let source = "x ← 1\nDISPLAY(y)\n";
        let diagnostic = Diagnostic::error("unresolved name `y`")
            .with_code("E0203")
            .with_label(Label::primary(Span::new(16, 17), "not found in this scope"))
            .with_help("assign a value to `y` before using it");

        let output = DiagnosticRenderer::new(source, "main.csp", false).render(&diagnostic);

        assert!(output.contains("error[E0203]: unresolved name `y`"));
        assert!(output.contains("main.csp:2:9"));
        assert!(output.contains("DISPLAY(y)"));
        assert!(output.contains("        ^"));
        assert!(output.contains("help: assign a value"));
    }

    #[test]
    fn test_render_summary() {
        let diagnostic = Diagnostic::error("boom").with_label(Label::primary(Span::new(0, 1), ""));
        let output = render_diagnostics("x", "main.csp", &[diagnostic], false);
        assert!(output.ends_with("error: aborting due to 1 error\n"));
    }

    #[test]
    fn test_json_form() {
        let diagnostic = Diagnostic::error("bad")
            .with_code("E0101")
            .with_label(Label::primary(Span::new(2, 4), ""));
        let json = diagnostic.to_json("a\nbcd");
        assert_eq!(json["start"], 2);
        assert_eq!(json["end"], 4);
        assert_eq!(json["line"], 2);
        assert_eq!(json["column"], 1);
        assert_eq!(json["code"], "E0101");
    }
}
