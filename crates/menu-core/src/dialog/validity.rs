use std::sync::LazyLock;

use regex::Regex;

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):(.+)$").unwrap());

static HIERARCHICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^//(?:[^/?#@\s]*@)?(?:\[[0-9A-Fa-f:.]+\]|[A-Za-z0-9\-._~%!$&'()*+,;=]+)(?::[0-9]{1,5})?(?:[/?#]\S*)?$")
        .unwrap()
});

const SPECIAL_SCHEMES: &[&str] = &["http", "https", "ftp", "ws", "wss", "file"];

/// Strict syntax check for link targets: a scheme, no whitespace, and a host
/// for the schemes that are hierarchical.
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return false;
    }
    let Some(captures) = SCHEME.captures(url) else {
        return false;
    };
    let scheme = captures[1].to_ascii_lowercase();
    let rest = &captures[2];
    if !SPECIAL_SCHEMES.contains(&scheme.as_str()) {
        return true;
    }
    if scheme == "file" {
        return rest.starts_with("//");
    }
    HIERARCHICAL.is_match(rest)
}

/// An in-flight image load started for one value of the URL field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub generation: u64,
    pub url: String,
}

/// Validity of the primary dialog field.
///
/// Image URLs are only known to be good once a probe loads them. Probes race
/// with typing, so every keystroke bumps the generation and a result counts
/// only when it carries the latest generation. Closing the session bumps it
/// too, so late results after close are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validity {
    valid: bool,
    generation: u64,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Synchronous rule: recomputed from the value itself.
    pub fn check_url(&mut self, url: &str) -> bool {
        self.generation += 1;
        self.valid = is_valid_url(url.trim());
        self.valid
    }

    /// Asynchronous rule: the keystroke starts a probe but does not itself
    /// change validity, except that an empty field is never valid.
    pub fn begin_probe(&mut self, url: &str) -> Option<Probe> {
        self.generation += 1;
        let url = url.trim();
        if url.is_empty() {
            self.valid = false;
            return None;
        }
        Some(Probe {
            generation: self.generation,
            url: url.to_string(),
        })
    }

    /// Applies a probe result. Returns false, changing nothing, when the
    /// probe has been superseded.
    pub fn resolve(&mut self, generation: u64, loaded: bool) -> bool {
        if generation != self.generation {
            tracing::trace!(generation, current = self.generation, "ignoring stale probe");
            return false;
        }
        self.valid = loaded;
        true
    }

    /// Invalidates every outstanding probe.
    pub fn retire(&mut self) {
        self.generation += 1;
        self.valid = false;
    }
}
