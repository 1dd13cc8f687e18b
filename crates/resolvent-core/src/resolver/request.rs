use serde::Serialize;

/// One resolution query: which package, and which subpath inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRequest {
    /// The package name as written in source.
    pub specifier: String,
    /// `"."` for a bare import, or the literal `"./..."` subpath string
    /// for a deep import.
    pub subpath: String,
}

impl ImportRequest {
    #[must_use]
    pub fn new(specifier: impl Into<String>, subpath: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            subpath: subpath.into(),
        }
    }

    /// A bare import of the package root.
    #[must_use]
    pub fn root(specifier: impl Into<String>) -> Self {
        Self::new(specifier, ".")
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.subpath == "."
    }

    /// Parse a raw bare specifier into package name and subpath.
    ///
    /// `"lodash"` parses to (`lodash`, `"."`); `"lodash/fp"` to
    /// (`lodash`, `"./fp"`). Scoped names consume two path segments:
    /// `"@scope/pkg/deep/x"` parses to (`@scope/pkg`, `"./deep/x"`).
    ///
    /// Returns `None` for anything that is not a bare package specifier
    /// (empty, relative, absolute, or hash imports, a lone scope, or a
    /// trailing slash).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.starts_with('.') || raw.starts_with('/') || raw.starts_with('#') {
            return None;
        }
        // A trailing slash leaves an empty final segment.
        if raw.ends_with('/') {
            return None;
        }

        // Scoped package: @scope/pkg or @scope/pkg/subpath
        if raw.starts_with('@') {
            let mut slash_count = 0;
            for (i, c) in raw.char_indices() {
                if c == '/' {
                    slash_count += 1;
                    if slash_count == 2 {
                        return Some(Self::new(&raw[..i], format!("./{}", &raw[i + 1..])));
                    }
                }
            }
            // A scope with no package name is not a valid specifier.
            if slash_count == 0 {
                return None;
            }
            return Some(Self::root(raw));
        }

        // Regular package: pkg or pkg/subpath
        match raw.find('/') {
            Some(pos) => Some(Self::new(&raw[..pos], format!("./{}", &raw[pos + 1..]))),
            None => Some(Self::root(raw)),
        }
    }
}
