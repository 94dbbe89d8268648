//! Indented text sink for generated Rust source.

use rustc_hash::FxHashMap;

use ember_ir::Name;

/// What a temporary holds; selects the identifier prefix.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TempKind {
    /// `Value`
    Value,
    /// `i64`
    Long,
    /// `f64`
    Double,
    /// `bool`
    Bool,
    /// `String`
    Str,
    /// `char`
    Char,
    /// `Var`
    Ref,
    /// `Arc<dyn Callable>`
    Callee,
    /// `RefArgs` of one call site
    RefArgs,
    /// `ArrayValue` under construction
    Array,
    /// `ArrayKey`
    Key,
    /// `ExprId` of a rebuilt node
    Expr,
}

impl TempKind {
    fn prefix(self) -> &'static str {
        match self {
            TempKind::Value => "_v",
            TempKind::Long => "_l",
            TempKind::Double => "_d",
            TempKind::Bool => "_b",
            TempKind::Str => "_s",
            TempKind::Char => "_c",
            TempKind::Ref => "_r",
            TempKind::Callee => "_f",
            TempKind::RefArgs => "_p",
            TempKind::Array => "_a",
            TempKind::Key => "_k",
            TempKind::Expr => "_e",
        }
    }
}

/// Accumulates generated lines.
///
/// Temporaries share one counter, so identifiers never collide even across
/// nested blocks. Interned names are collected separately: the compiler
/// binds each one once at the top of the generated function.
#[derive(Default)]
pub struct Emitter {
    out: String,
    indent: usize,
    next_temp: u32,
    names: Vec<String>,
    name_index: FxHashMap<Name, usize>,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter::default()
    }

    /// An emitter whose lines start `indent` levels deep.
    pub fn with_indent(indent: usize) -> Self {
        Emitter {
            indent,
            ..Emitter::default()
        }
    }

    /// A fresh temporary identifier.
    pub fn declare_temp(&mut self, kind: TempKind) -> String {
        let n = self.next_temp;
        self.next_temp += 1;
        format!("{}{n}", kind.prefix())
    }

    /// Identifier bound to `name` (spelled `text`), allocated on first use.
    pub fn declare_name(&mut self, name: Name, text: &str) -> String {
        let index = match self.name_index.get(&name) {
            Some(&index) => index,
            None => {
                let index = self.names.len();
                self.names.push(text.to_owned());
                self.name_index.insert(name, index);
                index
            }
        };
        format!("_n{index}")
    }

    /// `(identifier, text)` for every declared name, in allocation order.
    pub fn names(&self) -> impl Iterator<Item = (String, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("_n{i}"), text.as_str()))
    }

    /// Append text as-is.
    pub fn emit_raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Append one indented line.
    pub fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// `header {` and indent.
    pub fn open_block(&mut self, header: &str) {
        if header.is_empty() {
            self.writeln("{");
        } else {
            self.writeln(&format!("{header} {{"));
        }
        self.indent();
    }

    /// Dedent and `}`.
    pub fn close_block(&mut self) {
        self.close_block_with("");
    }

    /// Dedent and close with `}` followed by `suffix` (`;`, `,`).
    pub fn close_block_with(&mut self, suffix: &str) {
        self.dedent();
        self.writeln(&format!("}}{suffix}"));
    }

    /// `target.method(args...)` as text.
    pub fn emit_call(&self, target: &str, method: &str, args: &[&str]) -> String {
        format!("{target}.{method}({})", args.join(", "))
    }

    /// Everything written so far; the emitter keeps its names and counter.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}
