//! Thread-local regex cache for pattern compilation
//!
//! Grammar regexes only ever match at the current position, so they are
//! compiled anchored (`^(?:...)`). Compiled patterns are cached per thread.

use hashbrown::HashMap;
use regex::Regex;
use std::cell::RefCell;

thread_local! {
    /// Thread-local cache of compiled, anchored regex patterns
    static REGEX_CACHE: RefCell<HashMap<String, Regex>> = RefCell::new(HashMap::new());
}

/// Get or compile a pattern anchored at the start of the haystack
///
/// The cache is keyed by the pattern as written in the grammar.
#[inline]
pub fn get_or_compile(pattern: &str) -> Result<Regex, regex::Error> {
    REGEX_CACHE.with(|cache| {
        if let Some(regex) = cache.borrow().get(pattern) {
            return Ok(regex.clone());
        }

        log_trace!("Compiling pattern /{}/", pattern);
        let regex = Regex::new(&format!("^(?:{})", pattern))?;
        cache
            .borrow_mut()
            .insert(pattern.to_string(), regex.clone());
        Ok(regex)
    })
}

/// Clear the regex cache
pub fn clear_cache() {
    REGEX_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Get the number of cached patterns
pub fn cache_size() -> usize {
    REGEX_CACHE.with(|cache| cache.borrow().len())
}
