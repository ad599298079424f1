//! Thread-safe reuse of parsers and their compiled queries.
//!
//! Tree-sitter parsers are cheap to keep but not free to build (query
//! compilation dominates), and query objects must not be shared across
//! parsers. Each language gets a free-list capped at [`MAX_POOLED`];
//! `acquire` beyond the cap allocates a fresh parser that is simply dropped
//! on release.

use parking_lot::Mutex;

use crate::css::CssSyntax;
use crate::error::SyntaxError;
use crate::html::HtmlSyntax;
use crate::json::JsonSyntax;
use crate::script::{ScriptLang, ScriptSyntax};

/// Free-list size per language.
const MAX_POOLED: usize = 8;

type Factory<T> = Box<dyn Fn() -> Result<T, SyntaxError> + Send + Sync>;

/// Implemented by every pooled wrapper: clear leftover parse state before
/// the parser goes back on the free list.
pub trait PoolItem {
    fn reset(&mut self);
}

struct Pool<T> {
    items: Mutex<Vec<T>>,
    make: Factory<T>,
}

impl<T: PoolItem> Pool<T> {
    fn new(make: Factory<T>) -> Self {
        Self { items: Mutex::new(Vec::new()), make }
    }

    fn acquire(&self) -> Result<PoolGuard<'_, T>, SyntaxError> {
        let pooled = self.items.lock().pop();
        let item = match pooled {
            Some(item) => item,
            None => (self.make)()?,
        };
        Ok(PoolGuard { pool: self, item: Some(item) })
    }

    fn release(&self, mut item: T) {
        item.reset();
        let mut items = self.items.lock();
        if items.len() < MAX_POOLED {
            items.push(item);
        }
    }
}

/// RAII handle to a pooled parser; returns it to the pool on drop.
pub struct PoolGuard<'p, T: PoolItem> {
    pool: &'p Pool<T>,
    item: Option<T>,
}

impl PoolItem for CssSyntax {
    fn reset(&mut self) {
        self.reset_parser();
    }
}

impl PoolItem for HtmlSyntax {
    fn reset(&mut self) {
        self.reset_parser();
    }
}

impl PoolItem for ScriptSyntax {
    fn reset(&mut self) {
        self.reset_parser();
    }
}

impl PoolItem for JsonSyntax {
    fn reset(&mut self) {
        self.reset_parser();
    }
}

impl<T: PoolItem> std::ops::Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        #[allow(clippy::unwrap_used)] // item is Some until drop
        self.item.as_ref().unwrap()
    }
}

impl<T: PoolItem> std::ops::DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        #[allow(clippy::unwrap_used)] // item is Some until drop
        self.item.as_mut().unwrap()
    }
}

impl<T: PoolItem> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

/// One pool per supported tree-sitter language.
pub struct SyntaxPools {
    css: Pool<CssSyntax>,
    html: Pool<HtmlSyntax>,
    javascript: Pool<ScriptSyntax>,
    typescript: Pool<ScriptSyntax>,
    tsx: Pool<ScriptSyntax>,
    json: Pool<JsonSyntax>,
}

impl SyntaxPools {
    pub fn new() -> Self {
        Self {
            css: Pool::new(Box::new(CssSyntax::new)),
            html: Pool::new(Box::new(HtmlSyntax::new)),
            javascript: Pool::new(Box::new(|| ScriptSyntax::new(ScriptLang::Javascript))),
            typescript: Pool::new(Box::new(|| ScriptSyntax::new(ScriptLang::Typescript))),
            tsx: Pool::new(Box::new(|| ScriptSyntax::new(ScriptLang::Tsx))),
            json: Pool::new(Box::new(JsonSyntax::new)),
        }
    }

    pub fn css(&self) -> Result<PoolGuard<'_, CssSyntax>, SyntaxError> {
        self.css.acquire()
    }

    pub fn html(&self) -> Result<PoolGuard<'_, HtmlSyntax>, SyntaxError> {
        self.html.acquire()
    }

    pub fn script(&self, lang: ScriptLang) -> Result<PoolGuard<'_, ScriptSyntax>, SyntaxError> {
        match lang {
            ScriptLang::Javascript => self.javascript.acquire(),
            ScriptLang::Typescript => self.typescript.acquire(),
            ScriptLang::Tsx => self.tsx.acquire(),
        }
    }

    pub fn json(&self) -> Result<PoolGuard<'_, JsonSyntax>, SyntaxError> {
        self.json.acquire()
    }
}

impl Default for SyntaxPools {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_release_reuses_parser() {
        let pools = SyntaxPools::new();
        {
            let mut css = pools.css().unwrap();
            assert!(css.parse("a{}").is_some());
        }
        assert_eq!(pools.css.items.lock().len(), 1);
        let _guard = pools.css().unwrap();
        assert_eq!(pools.css.items.lock().len(), 0);
    }

    #[test]
    fn cap_bounds_the_free_list() {
        let pools = SyntaxPools::new();
        let guards: Vec<_> = (0..MAX_POOLED + 3).map(|_| pools.css().unwrap()).collect();
        drop(guards);
        assert_eq!(pools.css.items.lock().len(), MAX_POOLED);
    }

    #[test]
    fn pools_are_shareable_across_threads() {
        let pools = std::sync::Arc::new(SyntaxPools::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pools = std::sync::Arc::clone(&pools);
                std::thread::spawn(move || {
                    for _ in 0..8 {
                        let mut css = pools.css().unwrap();
                        let tree = css.parse(".a{color:var(--x)}").unwrap();
                        assert_eq!(css.var_calls(&tree, ".a{color:var(--x)}").len(), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().is_ok());
        }
    }
}
