use crate::error::RouteError;
use crate::i18n::LocaleRegistry;
use crate::router::{
    AssembleOptions, MatchContext, MatchOutcome, Params, Route, RouteStack,
};

/// A route with child routes.
///
/// The parent route matches first; a child match is accepted only when
/// parent and child together consume the rest of the path. With
/// `may_terminate` the parent alone may also match the full path.
pub struct Part {
    route: Box<dyn Route>,
    may_terminate: bool,
    children: RouteStack,
}

impl Part {
    pub fn new(route: impl Route + 'static, may_terminate: bool) -> Self {
        Self {
            route: Box::new(route),
            may_terminate,
            children: RouteStack::new(),
        }
    }

    pub fn with_child(mut self, name: impl Into<String>, route: impl Route + 'static) -> Self {
        self.children.add_route(name, route);
        self
    }
}

impl Route for Part {
    fn match_path(&self, cx: &MatchContext<'_>, offset: usize) -> Option<MatchOutcome> {
        let mut parent = match self.route.match_path(cx, offset)? {
            MatchOutcome::Match(parent) => parent,
            redirect @ MatchOutcome::Redirect(_) => return Some(redirect),
        };

        let path_length = cx.request.path().len();
        let next_offset = offset + parent.length();

        if self.may_terminate && next_offset == path_length {
            return Some(MatchOutcome::Match(parent));
        }

        match self
            .children
            .match_at(cx, next_offset, Some(path_length - next_offset))?
        {
            MatchOutcome::Match(child) => {
                parent.merge(child);
                Some(MatchOutcome::Match(parent))
            }
            redirect @ MatchOutcome::Redirect(_) => Some(redirect),
        }
    }

    fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        registry: Option<&LocaleRegistry>,
    ) -> Result<String, RouteError> {
        let mut path = self.route.assemble(params, options, registry)?;
        if options.name.is_some() {
            path.push_str(&self.children.assemble(params, options, registry)?);
        }
        Ok(path)
    }

    fn children(&self) -> Option<&RouteStack> {
        Some(&self.children)
    }
}
