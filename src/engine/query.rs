//! Runtime table enumeration: classes, selectors, ivars, protocols.
//!
//! All enumeration runs through the evaluator against the live runtime,
//! using the copy-list functions with a malloc'd out-parameter for the
//! count, the way the C API expects:
//!
//! ```text
//! unsigned int *count = malloc(sizeof(unsigned int));
//! Class *list = objc_copyClassList(count);
//! ... read *count, index list ...
//! free(list); free(count);
//! ```
//!
//! Copied buffers and count cells are released after reading; a failed free
//! is logged, never fatal.

use log::{debug, warn};

use crate::engine::error::ObjcError;
use crate::engine::pattern::NamePattern;
use crate::host::{require_nonzero, unquote, Evaluator, ValueKind};

/// Hierarchy walks stop after this many links. Runtime class graphs are
/// finite and acyclic, so a healthy target never gets close; a corrupted
/// one might loop.
pub const MAX_SUPERCLASS_DEPTH: usize = 64;

/// Upper bound of the compact presentation tier.
pub const COMPACT_MAX: usize = 20;

/// Presentation tier selected by match-set cardinality.
///
/// Above [`COMPACT_MAX`] matches, per-class hierarchy walks are skipped
/// entirely: each walk costs one evaluator round-trip per inheritance link
/// against a live process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Exactly one match: full hierarchy view
    Single,
    /// 2 to 20 matches: one compact hierarchy line per match
    Compact,
    /// More than 20 matches: flat name list
    List,
}

impl MatchTier {
    /// Classify a non-empty match count.
    pub fn for_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Single,
            n if n <= COMPACT_MAX => Self::Compact,
            _ => Self::List,
        }
    }
}

/// A class that satisfied a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatch {
    pub name: String,
    pub ptr: u64,
}

/// One instance variable of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvarInfo {
    pub name: String,
    pub offset: i64,
    pub type_encoding: String,
}

/// Enumerates live runtime tables through the evaluator.
pub struct RuntimeQuery<'a> {
    eval: &'a mut dyn Evaluator,
}

impl<'a> RuntimeQuery<'a> {
    pub fn new(eval: &'a mut dyn Evaluator) -> Self {
        Self { eval }
    }

    /// All registered classes whose name satisfies `pattern`, in runtime
    /// order. Entries the runtime cannot name are skipped with a warning.
    pub fn classes_matching(&mut self, pattern: &NamePattern) -> Result<Vec<ClassMatch>, ObjcError> {
        let (list, count) = self.copy_list(
            |cell| format!("(Class *)objc_copyClassList((unsigned int *)0x{:x})", cell),
            "objc_copyClassList",
        )?;
        debug!("runtime reports {} registered classes", count);

        let mut matches = Vec::new();
        for i in 0..count {
            let name_expr = format!(
                "(const char *)class_getName((Class)(*((Class *)0x{:x} + {})))",
                list, i
            );
            let name = match self.cstring(&name_expr, "class_getName") {
                Ok(name) => name,
                Err(e) => {
                    warn!("skipping class list entry {}: {}", i, e);
                    continue;
                }
            };
            if !pattern.matches(&name) {
                continue;
            }

            let ptr_expr = format!("(Class)(*((Class *)0x{:x} + {}))", list, i);
            let ptr = self.eval.evaluate(&ptr_expr);
            if !ptr.ok || ptr.value == 0 {
                warn!("skipping class '{}': unreadable class pointer", name);
                continue;
            }
            matches.push(ClassMatch {
                name,
                ptr: ptr.value,
            });
        }

        self.release(list);
        Ok(matches)
    }

    /// The superclass of a class pointer; zero means the root was reached.
    pub fn superclass_of(&mut self, class_ptr: u64) -> Result<u64, ObjcError> {
        let expr = format!("(Class)class_getSuperclass((Class)0x{:x})", class_ptr);
        let result = self.eval.evaluate(&expr);
        if !result.ok {
            return Err(ObjcError::QueryFailed {
                what: "class_getSuperclass".to_string(),
                detail: result.message,
            });
        }
        Ok(result.value)
    }

    /// The runtime name of a class pointer.
    pub fn class_name(&mut self, class_ptr: u64) -> Result<String, ObjcError> {
        let expr = format!("(const char *)class_getName((Class)0x{:x})", class_ptr);
        self.cstring(&expr, "class_getName")
    }

    /// Leaf-to-root chain of names, starting with the class itself.
    ///
    /// Terminates at the null superclass of the root class, or at
    /// [`MAX_SUPERCLASS_DEPTH`] links if the target's class graph is
    /// corrupted into a cycle.
    pub fn hierarchy(&mut self, name: &str, class_ptr: u64) -> Result<Vec<String>, ObjcError> {
        let mut chain = vec![name.to_string()];
        let mut cursor = class_ptr;
        for _ in 0..MAX_SUPERCLASS_DEPTH {
            let superclass = self.superclass_of(cursor)?;
            if superclass == 0 {
                return Ok(chain);
            }
            chain.push(self.class_name(superclass)?);
            cursor = superclass;
        }
        warn!(
            "superclass chain of '{}' exceeded {} links, truncating",
            name, MAX_SUPERCLASS_DEPTH
        );
        Ok(chain)
    }

    /// Ancestors of a class, leaf-to-root, excluding the class itself.
    pub fn ancestors(&mut self, class_ptr: u64) -> Result<Vec<ClassMatch>, ObjcError> {
        let mut chain = Vec::new();
        let mut cursor = class_ptr;
        for _ in 0..MAX_SUPERCLASS_DEPTH {
            let superclass = self.superclass_of(cursor)?;
            if superclass == 0 {
                return Ok(chain);
            }
            chain.push(ClassMatch {
                name: self.class_name(superclass)?,
                ptr: superclass,
            });
            cursor = superclass;
        }
        warn!("superclass chain exceeded {} links, truncating", MAX_SUPERCLASS_DEPTH);
        Ok(chain)
    }

    /// Selectors the class declares itself (inherited methods are not in
    /// this list; walk [`Self::ancestors`] for those).
    pub fn selectors_of(&mut self, class_ptr: u64) -> Result<Vec<String>, ObjcError> {
        let (list, count) = self.copy_list(
            |cell| {
                format!(
                    "(void **)class_copyMethodList((Class)0x{:x}, (unsigned int *)0x{:x})",
                    class_ptr, cell
                )
            },
            "class_copyMethodList",
        )?;

        let mut selectors = Vec::with_capacity(count as usize);
        for i in 0..count {
            let expr = format!(
                "(const char *)sel_getName((SEL)method_getName((void *)(*((void **)0x{:x} + {}))))",
                list, i
            );
            match self.cstring(&expr, "sel_getName") {
                Ok(name) => selectors.push(name),
                Err(e) => warn!("skipping method list entry {}: {}", i, e),
            }
        }

        self.release(list);
        Ok(selectors)
    }

    /// Instance variables the class declares itself.
    pub fn ivars_of(&mut self, class_ptr: u64) -> Result<Vec<IvarInfo>, ObjcError> {
        let (list, count) = self.copy_list(
            |cell| {
                format!(
                    "(void **)class_copyIvarList((Class)0x{:x}, (unsigned int *)0x{:x})",
                    class_ptr, cell
                )
            },
            "class_copyIvarList",
        )?;

        let mut ivars = Vec::with_capacity(count as usize);
        for i in 0..count {
            let element = format!("(*((void **)0x{:x} + {}))", list, i);
            let name = match self.cstring(
                &format!("(const char *)ivar_getName((void *){})", element),
                "ivar_getName",
            ) {
                Ok(name) => name,
                Err(e) => {
                    warn!("skipping ivar list entry {}: {}", i, e);
                    continue;
                }
            };
            let offset = self.eval.evaluate(&format!("(long)ivar_getOffset((void *){})", element));
            if !offset.ok {
                warn!("offset of ivar '{}' unreadable: {}", name, offset.message);
            }
            let type_encoding = self
                .cstring(
                    &format!("(const char *)ivar_getTypeEncoding((void *){})", element),
                    "ivar_getTypeEncoding",
                )
                .unwrap_or_else(|e| {
                    warn!("type encoding of ivar '{}' unreadable: {}", name, e);
                    String::new()
                });
            ivars.push(IvarInfo {
                name,
                offset: offset.value as i64,
                type_encoding,
            });
        }

        self.release(list);
        Ok(ivars)
    }

    /// Size of one instance of the class, in bytes.
    pub fn instance_size(&mut self, class_ptr: u64) -> Result<u64, ObjcError> {
        let expr = format!("(size_t)class_getInstanceSize((Class)0x{:x})", class_ptr);
        let result = self.eval.evaluate(&expr);
        if !result.ok {
            return Err(ObjcError::QueryFailed {
                what: "class_getInstanceSize".to_string(),
                detail: result.message,
            });
        }
        Ok(result.value)
    }

    /// Protocols the class adopts itself.
    pub fn protocols_of(&mut self, class_ptr: u64) -> Result<Vec<String>, ObjcError> {
        let (list, count) = self.copy_list(
            |cell| {
                format!(
                    "(void **)class_copyProtocolList((Class)0x{:x}, (unsigned int *)0x{:x})",
                    class_ptr, cell
                )
            },
            "class_copyProtocolList",
        )?;

        let mut protocols = Vec::with_capacity(count as usize);
        for i in 0..count {
            let expr = format!(
                "(const char *)protocol_getName((void *)(*((void **)0x{:x} + {})))",
                list, i
            );
            match self.cstring(&expr, "protocol_getName") {
                Ok(name) => protocols.push(name),
                Err(e) => warn!("skipping protocol list entry {}: {}", i, e),
            }
        }

        self.release(list);
        Ok(protocols)
    }

    /// Run one of the runtime `copy*List` calls: allocate the count cell,
    /// evaluate the list expression built by `build`, read the count back,
    /// release the cell. Returns `(list_ptr, count)`; a null list with a
    /// zero count is how the runtime reports an empty table.
    fn copy_list(
        &mut self,
        build: impl FnOnce(u64) -> String,
        what: &str,
    ) -> Result<(u64, u64), ObjcError> {
        let cell_result = self.eval.evaluate("(unsigned int *)malloc(sizeof(unsigned int))");
        let cell = require_nonzero(&cell_result, ValueKind::Buffer, "malloc")?;

        let list_result = self.eval.evaluate(&build(cell));
        if !list_result.ok {
            self.release(cell);
            return Err(ObjcError::QueryFailed {
                what: what.to_string(),
                detail: list_result.message,
            });
        }
        let list = list_result.value;

        let count = if list == 0 {
            0
        } else {
            let count_result = self
                .eval
                .evaluate(&format!("(unsigned int)(*(unsigned int *)0x{:x})", cell));
            if !count_result.ok {
                self.release(cell);
                self.release(list);
                return Err(ObjcError::QueryFailed {
                    what: format!("{} count", what),
                    detail: count_result.message,
                });
            }
            count_result.value
        };

        self.release(cell);
        Ok((list, count))
    }

    /// Evaluate an expression producing a C string and return it unquoted.
    fn cstring(&mut self, expr: &str, what: &str) -> Result<String, ObjcError> {
        let result = self.eval.evaluate(expr);
        if !result.ok {
            return Err(ObjcError::QueryFailed {
                what: what.to_string(),
                detail: result.message,
            });
        }
        Ok(unquote(&result.message))
    }

    /// Release a runtime-allocated buffer; never fatal.
    fn release(&mut self, ptr: u64) {
        if ptr == 0 {
            return;
        }
        let result = self.eval.evaluate(&format!("(void)free((void *)0x{:x})", ptr));
        if !result.ok {
            warn!("failed to free runtime buffer 0x{:x}: {}", ptr, result.message);
        }
    }
}
