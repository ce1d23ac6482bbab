//! Method reference and invocation parsing.
//!
//! Pure text handling: nothing here touches the target process, so parsing
//! can only fail on malformed syntax, never because a class does not exist.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::engine::error::ObjcError;

/// Whether a reference names an instance method (`-`) or a class method (`+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// `-[Class selector]`
    Instance,
    /// `+[Class selector]`
    Class,
}

impl MethodKind {
    /// The sigil used in the Objective-C spelling
    pub fn prefix(&self) -> char {
        match self {
            Self::Instance => '-',
            Self::Class => '+',
        }
    }

    /// Human-readable name for messages
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Instance => "instance",
            Self::Class => "class",
        }
    }
}

/// A parsed `-[ClassName selector:]` / `+[ClassName selector:]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub kind: MethodKind,
    pub class_name: String,
    pub selector: String,
}

impl MethodSignature {
    /// Number of arguments the selector declares (one per colon)
    pub fn arg_count(&self) -> usize {
        self.selector.matches(':').count()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{} {}]", self.kind.prefix(), self.class_name, self.selector)
    }
}

/// Receiver of an `ocall` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// Bare class name, resolved through the runtime
    Class(String),
    /// Address literal (`0x600001234560`)
    Address(u64),
    /// `$`-prefixed register or expression variable, evaluated in the frame
    Token(String),
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => write!(f, "{}", name),
            Self::Address(addr) => write!(f, "0x{:x}", addr),
            Self::Token(tok) => write!(f, "{}", tok),
        }
    }
}

/// A parsed invocation: receiver, selector keywords, and inline arguments.
///
/// `args` holds the argument expressions verbatim; they are handed to the
/// evaluator untouched, so anything the host's expression language accepts
/// (`@"hello"`, `42`, `[NSNumber numberWithInt:7]`) is fine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub kind: MethodKind,
    pub target: CallTarget,
    pub selector: String,
    pub args: Vec<String>,
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{} {}]", self.kind.prefix(), self.target, self.selector)
    }
}

fn selector_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Either a plain identifier (zero-argument selector) or one or more
    // `identifier:` segments
    RE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]*|(?:[A-Za-z_][A-Za-z0-9_]*:)+)$")
            .expect("selector regex is valid")
    })
}

/// Is `s` a syntactically valid selector?
pub fn is_valid_selector(s: &str) -> bool {
    selector_regex().is_match(s)
}

fn method_kind(input: &str) -> Option<MethodKind> {
    if input.starts_with("-[") {
        Some(MethodKind::Instance)
    } else if input.starts_with("+[") {
        Some(MethodKind::Class)
    } else {
        None
    }
}

/// Strip the leading `-[`/`+[` and the trailing `]` if present.
fn bracket_body(input: &str) -> &str {
    let body = &input[2..];
    body.strip_suffix(']').unwrap_or(body)
}

/// Parse a method reference like `-[ClassName selector:]`.
///
/// The bracketed content must split into exactly two whitespace-separated
/// parts: class name and selector. `-[NSString]` and `-[Too Many Words]`
/// are both rejected.
pub fn parse_signature(input: &str) -> Result<MethodSignature, ObjcError> {
    let input = input.trim();

    let kind = method_kind(input).ok_or_else(|| {
        ObjcError::Syntax("Expected -[ClassName selector:] or +[ClassName selector:]".to_string())
    })?;

    let parts: Vec<&str> = bracket_body(input).split_whitespace().collect();
    if parts.len() != 2 {
        return Err(ObjcError::Syntax(
            "Invalid format. Expected: -[ClassName selector:]".to_string(),
        ));
    }

    let class_name = parts[0].to_string();
    let selector = parts[1].to_string();
    if !is_valid_selector(&selector) {
        return Err(ObjcError::Syntax(format!("Invalid selector '{}'", selector)));
    }

    Ok(MethodSignature {
        kind,
        class_name,
        selector,
    })
}

fn parse_address_literal(s: &str) -> Option<u64> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if s.chars().all(|c| c.is_ascii_digit()) && !s.is_empty() {
        s.parse::<u64>().ok()
    } else {
        None
    }
}

fn parse_receiver(token: &str, kind: MethodKind) -> Result<CallTarget, ObjcError> {
    if token.starts_with('$') {
        if kind == MethodKind::Class {
            return Err(ObjcError::Syntax(
                "Class method calls take a class name, not a register or variable".to_string(),
            ));
        }
        if token.len() == 1 {
            return Err(ObjcError::Syntax("Empty receiver token '$'".to_string()));
        }
        return Ok(CallTarget::Token(token.to_string()));
    }

    if let Some(addr) = parse_address_literal(token) {
        if kind == MethodKind::Class {
            return Err(ObjcError::Syntax(
                "Class method calls take a class name, not an address".to_string(),
            ));
        }
        return Ok(CallTarget::Address(addr));
    }

    if token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Ok(CallTarget::Class(token.to_string()));
    }

    Err(ObjcError::Syntax(format!("Invalid receiver '{}'", token)))
}

/// Split the selector-and-arguments text into whitespace-separated tokens,
/// keeping double-quoted strings and bracketed groups attached.
fn split_call_tokens(s: &str) -> Result<Vec<String>, ObjcError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in s.chars() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                current.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if in_string {
        return Err(ObjcError::Syntax("Unterminated string literal".to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Parse an invocation like `+[NSString stringWithString:@"hello"]` or
/// `-[$x0 description]`.
///
/// Unlike [`parse_signature`], the text after the receiver may carry inline
/// argument expressions: each `keyword:argument` token contributes one
/// selector segment and one argument.
pub fn parse_call(input: &str) -> Result<CallExpr, ObjcError> {
    let input = input.trim();

    let kind = method_kind(input).ok_or_else(|| {
        ObjcError::Syntax("Expected -[receiver selector...] or +[ClassName selector...]".to_string())
    })?;

    let body = bracket_body(input);
    let (receiver_token, rest) = match body.split_once(char::is_whitespace) {
        Some((recv, rest)) => (recv, rest.trim()),
        None => {
            return Err(ObjcError::Syntax(
                "Invalid format. Expected: -[receiver selector...]".to_string(),
            ))
        }
    };
    if receiver_token.is_empty() || rest.is_empty() {
        return Err(ObjcError::Syntax(
            "Invalid format. Expected: -[receiver selector...]".to_string(),
        ));
    }

    let target = parse_receiver(receiver_token, kind)?;
    let tokens = split_call_tokens(rest)?;

    // Zero-argument selector: a single bare token with no colon
    if tokens.len() == 1 && !tokens[0].contains(':') {
        let selector = tokens[0].clone();
        if !is_valid_selector(&selector) {
            return Err(ObjcError::Syntax(format!("Invalid selector '{}'", selector)));
        }
        return Ok(CallExpr {
            kind,
            target,
            selector,
            args: Vec::new(),
        });
    }

    // Keyword selector: every token is `keyword:argument`
    let mut selector = String::new();
    let mut args = Vec::new();
    for token in &tokens {
        let (keyword, arg) = token.split_once(':').ok_or_else(|| {
            ObjcError::Syntax(format!(
                "Expected 'keyword:argument', got '{}' (multi-word arguments need parentheses or quotes)",
                token
            ))
        })?;
        if arg.is_empty() {
            return Err(ObjcError::Syntax(format!(
                "Missing argument after '{}:'",
                keyword
            )));
        }
        selector.push_str(keyword);
        selector.push(':');
        args.push(arg.to_string());
    }

    if !is_valid_selector(&selector) {
        return Err(ObjcError::Syntax(format!("Invalid selector '{}'", selector)));
    }

    Ok(CallExpr {
        kind,
        target,
        selector,
        args,
    })
}
