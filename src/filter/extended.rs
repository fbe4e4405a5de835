//! Extended glob: `DIRGLOB[/DIREXCLUDE]|SUFFIXLIST`.
//!
//! The directory part is matched, case-insensitively, against the name of the
//! directory containing the candidate. The suffix list is comma separated:
//!
//! | token       | meaning                                        |
//! |-------------|------------------------------------------------|
//! | `*`         | any file                                       |
//! | *(empty)*   | only files without an extension                |
//! | `jpg`       | files with extension `jpg`                     |
//! | `cover.jpg` | names matching the glob `cover.jpg`            |
//! | `.jpg`      | same as `*.jpg`                                |
//! | `*.!jpg`    | stem matches `*`, extension is anything but `jpg` |

use std::path::Path;
use std::sync::LazyLock;

use globset::GlobMatcher;
use regex::Regex;

use super::pattern::compile_glob;
use crate::error::TraverseError;

static SUFFIX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<base>[^!]*?)\.(?P<neg>!)?(?P<ext>[^.!]+)$").expect("suffix token regex is valid")
});

const ANY: &str = "*";

#[derive(Debug, Clone)]
pub struct ExtendedGlob {
    directory: GlobMatcher,
    exclusion: Option<GlobMatcher>,
    suffixes: Suffixes,
}

#[derive(Debug, Clone)]
enum Suffixes {
    Any,
    Bare,
    Tokens(Vec<SuffixToken>),
}

impl ExtendedGlob {
    pub fn parse(pattern: &str) -> Result<Self, TraverseError> {
        let (dirs, suffixes) = pattern
            .split_once('|')
            .ok_or_else(|| TraverseError::InvalidExtendedGlob {
                pattern: pattern.to_string(),
                reason: "missing '|' separator",
            })?;

        let (include, exclude) = match dirs.split_once('/') {
            Some((include, exclude)) => (include.trim(), Some(exclude.trim())),
            None => (dirs.trim(), None),
        };
        let include = if include.is_empty() { ANY } else { include };

        let directory = compile_glob(include, true)?;
        let exclusion = exclude
            .filter(|e| !e.is_empty())
            .map(|e| compile_glob(e, true))
            .transpose()?;

        let tokens: Vec<&str> = suffixes
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        let suffixes = if tokens.contains(&ANY) {
            Suffixes::Any
        } else if tokens.is_empty() {
            Suffixes::Bare
        } else {
            Suffixes::Tokens(
                tokens
                    .into_iter()
                    .map(SuffixToken::parse)
                    .collect::<Result<_, _>>()?,
            )
        };

        Ok(Self {
            directory,
            exclusion,
            suffixes,
        })
    }

    /// The suffix tokens, empty for `*` and for the bare (no extension) form.
    pub fn tokens(&self) -> &[SuffixToken] {
        match &self.suffixes {
            Suffixes::Tokens(tokens) => tokens,
            Suffixes::Any | Suffixes::Bare => &[],
        }
    }

    pub fn is_match(&self, parent: &str, name: &str) -> bool {
        if !self.directory.is_match(parent) {
            return false;
        }
        if self.exclusion.as_ref().is_some_and(|ex| ex.is_match(parent)) {
            return false;
        }

        match &self.suffixes {
            Suffixes::Any => true,
            Suffixes::Bare => Path::new(name).extension().is_none(),
            Suffixes::Tokens(tokens) => tokens.iter().any(|t| t.is_match(name)),
        }
    }
}

/// One entry of an extended glob's suffix list.
#[derive(Debug, Clone)]
pub struct SuffixToken {
    pub base: String,
    pub ext: String,
    /// `base.!ext`: anything but `ext`.
    pub exclude_ext: bool,
    /// Glob applied to the whole name, or to the stem when `exclude_ext`.
    pub matcher: String,
    glob: GlobMatcher,
}

impl SuffixToken {
    pub fn parse(token: &str) -> Result<Self, TraverseError> {
        let (base, ext, exclude_ext) = match SUFFIX_TOKEN.captures(token) {
            Some(caps) => (
                caps["base"].to_string(),
                caps["ext"].to_string(),
                caps.name("neg").is_some(),
            ),
            None if !token.contains('.') => match token.strip_prefix('!') {
                Some(ext) => (ANY.to_string(), ext.to_string(), true),
                None => (ANY.to_string(), token.to_string(), false),
            },
            None => {
                return Err(TraverseError::InvalidExtendedGlob {
                    pattern: token.to_string(),
                    reason: "malformed suffix",
                })
            }
        };

        let stem = if base.is_empty() { ANY } else { base.as_str() };
        let matcher = if exclude_ext {
            stem.to_string()
        } else {
            format!("{stem}.{ext}")
        };
        let glob = compile_glob(&matcher, true)?;

        Ok(Self {
            base,
            ext,
            exclude_ext,
            matcher,
            glob,
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        if !self.exclude_ext {
            return self.glob.is_match(name);
        }

        let path = Path::new(name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let excluded = path
            .extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(&self.ext));

        self.glob.is_match(stem) && !excluded
    }
}
