//! Function library registered on every template.
//!
//! gtmpl functions are plain `fn` pointers, so the feature readers cannot
//! capture their directory. It is bound per thread for the length of a
//! render instead (see [`bind_feature_dir`]).

use crate::io;
use crate::paths;
use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use gtmpl::{Func, FuncError, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Functions gtmpl provides on every template.
const GO_BUILTINS: [&str; 18] = [
    "and", "call", "eq", "ge", "gt", "html", "index", "js", "le", "len", "lt", "ne", "not", "or",
    "print", "printf", "println", "urlquery",
];

thread_local! {
    static FEATURE_DIR: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

/// Named functions a template may call, plus the feature directory the
/// reader functions resolve against. Names are kept sorted so hint messages
/// list them deterministically.
#[derive(Clone, Default)]
pub struct FuncMap {
    funcs: BTreeMap<&'static str, Func>,
    feature_dir: Option<PathBuf>,
}

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, f: Func) {
        self.funcs.insert(name, f);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name) || GO_BUILTINS.contains(&name)
    }

    /// Every callable name, registered and builtin, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().copied().chain(GO_BUILTINS).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn feature_dir(&self) -> Option<&PathBuf> {
        self.feature_dir.as_ref()
    }

    /// `upper`, `lower`, `title`, `trim` and `now`.
    pub fn builtin() -> Self {
        let mut m = Self::new();
        m.insert("upper", upper);
        m.insert("lower", lower);
        m.insert("title", title);
        m.insert("trim", trim);
        m.insert("now", now);
        m
    }

    /// The builtins plus `readSpec`, `readPlan`, `readTasks` and `readFile`,
    /// bound to one feature directory. Empty `root` or `feature` makes every
    /// reader return the empty string.
    pub fn with_feature_readers(root: &str, feature: &str) -> Self {
        let mut m = Self::builtin();
        m.insert("readSpec", read_spec);
        m.insert("readPlan", read_plan);
        m.insert("readTasks", read_tasks);
        m.insert("readFile", read_file);
        if !root.is_empty() && !feature.is_empty() {
            m.feature_dir = Some(paths::feature_dir(&PathBuf::from(root), feature));
        }
        m
    }

    pub(super) fn register(&self, tmpl: &mut gtmpl::Template) {
        for (name, f) in &self.funcs {
            tmpl.add_func(name, *f);
        }
    }
}

/// Restores the previously bound feature directory on drop.
pub(super) struct FeatureDirGuard {
    previous: Option<PathBuf>,
}

impl Drop for FeatureDirGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        FEATURE_DIR.with(|dir| {
            dir.replace(previous);
        });
    }
}

/// Make `dir` visible to the reader functions on this thread until the
/// returned guard is dropped.
pub(super) fn bind_feature_dir(dir: Option<PathBuf>) -> FeatureDirGuard {
    let previous = FEATURE_DIR.with(|d| d.replace(dir));
    FeatureDirGuard { previous }
}

fn read_document(document: &str) -> String {
    FEATURE_DIR
        .with(|dir| {
            dir.borrow()
                .as_ref()
                .and_then(|d| io::read_optional(&d.join(document)))
        })
        .unwrap_or_default()
}

/// Text form of an argument. Nil and missing values read as empty.
fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Nil | Value::NoValue => String::new(),
        other => other.to_string(),
    }
}

fn arity(name: &str, want: usize, args: &[Value]) -> Result<(), FuncError> {
    if args.len() == want {
        Ok(())
    } else {
        Err(FuncError::Generic(format!(
            "wrong number of args for {name}: want {want} got {}",
            args.len()
        )))
    }
}

fn string_arg(name: &str, args: &[Value]) -> Result<String, FuncError> {
    arity(name, 1, args)?;
    Ok(text(&args[0]))
}

fn upper(args: &[Value]) -> Result<Value, FuncError> {
    Ok(Value::String(string_arg("upper", args)?.to_uppercase()))
}

fn lower(args: &[Value]) -> Result<Value, FuncError> {
    Ok(Value::String(string_arg("lower", args)?.to_lowercase()))
}

fn title(args: &[Value]) -> Result<Value, FuncError> {
    Ok(Value::String(title_case(&string_arg("title", args)?)))
}

fn trim(args: &[Value]) -> Result<Value, FuncError> {
    Ok(Value::String(string_arg("trim", args)?.trim().to_string()))
}

fn now(args: &[Value]) -> Result<Value, FuncError> {
    let ts = Utc::now();
    match args {
        [] => Ok(Value::String(ts.to_rfc3339())),
        [fmt] => {
            let fmt = text(fmt);
            if StrftimeItems::new(&fmt).any(|item| matches!(item, Item::Error)) {
                return Err(FuncError::Generic(format!("invalid time format {fmt:?}")));
            }
            Ok(Value::String(ts.format(&fmt).to_string()))
        }
        _ => Err(FuncError::Generic(format!(
            "wrong number of args for now: want 0-1 got {}",
            args.len()
        ))),
    }
}

fn read_spec(args: &[Value]) -> Result<Value, FuncError> {
    arity("readSpec", 0, args)?;
    Ok(Value::String(read_document(paths::SPEC_MD)))
}

fn read_plan(args: &[Value]) -> Result<Value, FuncError> {
    arity("readPlan", 0, args)?;
    Ok(Value::String(read_document(paths::PLAN_MD)))
}

fn read_tasks(args: &[Value]) -> Result<Value, FuncError> {
    arity("readTasks", 0, args)?;
    Ok(Value::String(read_document(paths::TASKS_MD)))
}

fn read_file(args: &[Value]) -> Result<Value, FuncError> {
    let name = string_arg("readFile", args)?;
    if !paths::is_plain_file_name(&name) {
        return Ok(Value::String(String::new()));
    }
    Ok(Value::String(read_document(&name)))
}

/// Capitalise the first letter of every whitespace-separated word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}
