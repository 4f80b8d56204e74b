use crate::error::RouteError;
use crate::i18n::LocaleRegistry;
use crate::router::{AssembleOptions, MatchContext, MatchOutcome, Params, Route, RouteMatch};

/// Matches a fixed piece of path.
#[derive(Debug, Clone)]
pub struct Literal {
    route: String,
    defaults: Params,
}

impl Literal {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            defaults: Params::new(),
        }
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }
}

impl Route for Literal {
    fn match_path(&self, cx: &MatchContext<'_>, offset: usize) -> Option<MatchOutcome> {
        let rest = cx.request.path().get(offset..)?;
        rest.starts_with(&self.route).then(|| {
            MatchOutcome::Match(RouteMatch::new(self.defaults.clone(), self.route.len()))
        })
    }

    fn assemble(
        &self,
        _params: &Params,
        _options: &AssembleOptions,
        _registry: Option<&LocaleRegistry>,
    ) -> Result<String, RouteError> {
        Ok(self.route.clone())
    }
}
