//! The IR emitter: an append-only textual buffer split into a header region
//! (declarations, string globals) and a body region (function definitions),
//! plus the monotonic id counter and the string-constant table.

use std::collections::{HashMap, VecDeque};

const INDENT_UNIT: &str = "  ";

/// Builds the textual LLVM IR buffer for one compilation.
pub struct IrEmitter {
    /// Lines pushed to the *front* as they're added, so later insertions end
    /// up earlier in the final text — matching `spec.md`'s "prepended in
    /// reverse order" description of the header.
    header: VecDeque<String>,
    body: String,
    indent_level: usize,
    next_id: u64,
    next_str_id: u64,
    string_table: HashMap<String, String>,
}

impl IrEmitter {
    pub fn new() -> Self {
        let mut emitter = Self {
            header: VecDeque::new(),
            body: String::new(),
            indent_level: 0,
            next_id: 0,
            next_str_id: 0,
            string_table: HashMap::new(),
        };
        // The program root always needs these available, regardless of
        // whether the source ever calls print/scan.
        emitter.emit_header("declare i32 @scanf(i8*, ...)");
        emitter.emit_header("declare i32 @printf(i8*, ...)");
        emitter
    }

    /// Appends `line` to the body at the current indentation.
    pub fn emit(&mut self, line: &str) {
        for _ in 0..self.indent_level {
            self.body.push_str(INDENT_UNIT);
        }
        self.body.push_str(line);
        self.body.push('\n');
    }

    /// Emits `name:` at the current indentation and increases it by one
    /// level for the instructions that follow. Basic blocks are not lexically
    /// nested in LLVM IR even when the source constructs that produced them
    /// were (an `if` inside an `if`), so callers close the previous label
    /// with [`Self::close_label`] before opening a sibling one — the
    /// resulting text stays a flat "label, then one indent level of body"
    /// shape no matter how deeply the source nested.
    pub fn emit_label(&mut self, name: &str) {
        for _ in 0..self.indent_level {
            self.body.push_str(INDENT_UNIT);
        }
        self.body.push_str(name);
        self.body.push_str(":\n");
        self.indent_level += 1;
    }

    /// Ends the current label's block, dropping back one indentation level.
    pub fn close_label(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Prepends `line` to the header region.
    pub fn emit_header(&mut self, line: &str) {
        self.header.push_front(line.to_owned());
    }

    /// Returns a fresh, process-unique integer for naming registers/labels.
    pub fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Interns `s`, returning its global name. Re-interning identical content
    /// returns the name assigned on first insertion rather than allocating a
    /// new one.
    pub fn intern_string(&mut self, s: &str) -> String {
        if let Some(existing) = self.string_table.get(s) {
            return existing.clone();
        }

        let name = format!("@str.{}", self.next_str_id);
        self.next_str_id += 1;

        let encoded = encode_string_literal(s);
        // +1 for the trailing NUL terminator byte.
        let len = s.len() + 1;
        self.emit_header(&format!(
            "{name} = private constant [{len} x i8] c\"{encoded}\\00\""
        ));

        self.string_table.insert(s.to_owned(), name.clone());
        name
    }

    /// Concatenates the header and body regions into the final IR text.
    pub fn finish(self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

impl Default for IrEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes a string literal's body per `spec.md` §6: NUL, newline, and `"`
/// are escaped; nothing else is (callers must not embed other control
/// bytes).
fn encode_string_literal(s: &str) -> String {
    // Iterate by Unicode scalar value, not by byte: the output buffer is
    // itself UTF-8 text, so passing a multi-byte character through as a
    // `char` re-encodes it identically, whereas reinterpreting its raw bytes
    // as Latin-1 code points would corrupt it.
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\u{0}' => out.push_str("\\00"),
            '\n' => out.push_str("\\0A"),
            '"' => out.push_str("\\22"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_id_is_monotonic_and_unique() {
        let mut emitter = IrEmitter::new();
        let a = emitter.fresh_id();
        let b = emitter.fresh_id();
        let c = emitter.fresh_id();
        assert_eq!([a, b, c], [0, 1, 2]);
    }

    #[test]
    fn interning_same_string_twice_returns_same_name() {
        let mut emitter = IrEmitter::new();
        let first = emitter.intern_string("hi\n");
        let second = emitter.intern_string("hi\n");
        assert_eq!(first, second);

        let text = emitter.finish();
        assert_eq!(text.matches("private constant").count(), 1);
    }

    #[test]
    fn distinct_strings_get_distinct_names() {
        let mut emitter = IrEmitter::new();
        let a = emitter.intern_string("a");
        let b = emitter.intern_string("b");
        assert_ne!(a, b);
    }

    #[test]
    fn header_always_declares_printf_and_scanf() {
        let emitter = IrEmitter::new();
        let text = emitter.finish();
        assert!(text.contains("declare i32 @printf(i8*, ...)"));
        assert!(text.contains("declare i32 @scanf(i8*, ...)"));
    }

    #[test]
    fn string_constant_length_counts_utf8_bytes_plus_one() {
        let mut emitter = IrEmitter::new();
        emitter.intern_string("hi\n");
        let text = emitter.finish();
        // "hi\n" is 3 bytes, + 1 for the NUL terminator.
        assert!(text.contains("[4 x i8] c\"hi\\0A\\00\""));
    }

    #[test]
    fn string_constant_length_counts_non_ascii_bytes_correctly() {
        let mut emitter = IrEmitter::new();
        // 'é' is 2 bytes in UTF-8; byte length should drive L, not char count.
        emitter.intern_string("é");
        let text = emitter.finish();
        assert!(text.contains("[3 x i8]"));
    }

    #[test]
    fn quote_and_nul_are_escaped() {
        let mut emitter = IrEmitter::new();
        emitter.intern_string("a\"b\0c");
        let text = emitter.finish();
        assert!(text.contains("a\\22b\\00c"));
    }
}
