use crate::error::RouteError;
use crate::i18n::LocaleRegistry;
use crate::router::{AssembleOptions, MatchContext, MatchOutcome, Params, Route, RouteMatch};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Param(String),
}

/// Path pattern with `:name` parameters, e.g. `/post/:slug`.
///
/// A parameter name is made of ASCII alphanumerics and `_`; its value runs
/// up to the next `/` and must not be empty.
#[derive(Debug, Clone)]
pub struct Segment {
    tokens: Vec<Token>,
    defaults: Params,
}

impl Segment {
    pub fn new(pattern: &str) -> Self {
        Self {
            tokens: tokenize(pattern),
            defaults: Params::new(),
        }
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ':' {
            text.push(c);
            continue;
        }

        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphanumeric() || next == '_' {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }

        if name.is_empty() {
            text.push(':');
            continue;
        }
        if !text.is_empty() {
            tokens.push(Token::Text(std::mem::take(&mut text)));
        }
        tokens.push(Token::Param(name));
    }

    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    tokens
}

impl Route for Segment {
    fn match_path(&self, cx: &MatchContext<'_>, offset: usize) -> Option<MatchOutcome> {
        let path = cx.request.path();
        let mut pos = offset;
        let mut params = self.defaults.clone();

        for token in &self.tokens {
            let rest = path.get(pos..)?;
            match token {
                Token::Text(text) => {
                    if !rest.starts_with(text.as_str()) {
                        return None;
                    }
                    pos += text.len();
                }
                Token::Param(name) => {
                    let len = rest.find('/').unwrap_or(rest.len());
                    if len == 0 {
                        return None;
                    }
                    params.insert(name.clone(), rest[..len].to_string());
                    pos += len;
                }
            }
        }

        Some(MatchOutcome::Match(RouteMatch::new(params, pos - offset)))
    }

    fn assemble(
        &self,
        params: &Params,
        _options: &AssembleOptions,
        _registry: Option<&LocaleRegistry>,
    ) -> Result<String, RouteError> {
        let mut path = String::new();
        for token in &self.tokens {
            match token {
                Token::Text(text) => path.push_str(text),
                Token::Param(name) => {
                    let value = params
                        .get(name)
                        .or_else(|| self.defaults.get(name))
                        .ok_or_else(|| RouteError::MissingParameter(name.clone()))?;
                    path.push_str(value);
                }
            }
        }
        Ok(path)
    }
}
