use crate::error::RouteError;
use crate::i18n::LocaleRegistry;
use crate::router::{AssembleOptions, MatchContext, MatchOutcome, Params, Route};
use indexmap::IndexMap;

/// Ordered collection of named routes.
///
/// Routes are tried in registration order. Names may be addressed as
/// `parent/child` (or `parent.child`) when assembling nested routes.
#[derive(Default)]
pub struct RouteStack {
    routes: IndexMap<String, Box<dyn Route>>,
}

impl RouteStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, name: impl Into<String>, route: impl Route + 'static) -> Self {
        self.add_route(name, route);
        self
    }

    /// Register a route. Re-using a name replaces the earlier route in place.
    pub fn add_route(&mut self, name: impl Into<String>, route: impl Route + 'static) {
        self.routes.insert(name.into(), Box::new(route));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Route> {
        self.routes.get(name).map(|route| route.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Route)> {
        self.routes
            .iter()
            .map(|(name, route)| (name.as_str(), route.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Try each route at `offset`.
    ///
    /// With `expected_length`, a match is only accepted when it consumed
    /// exactly that many bytes. A redirect from any route ends the search.
    pub fn match_at(
        &self,
        cx: &MatchContext<'_>,
        offset: usize,
        expected_length: Option<usize>,
    ) -> Option<MatchOutcome> {
        for (name, route) in self.iter() {
            match route.match_path(cx, offset) {
                Some(MatchOutcome::Redirect(redirect)) => {
                    return Some(MatchOutcome::Redirect(redirect));
                }
                Some(MatchOutcome::Match(mut route_match))
                    if expected_length.map_or(true, |len| route_match.length() == len) =>
                {
                    route_match.set_matched_route_name(name);
                    return Some(MatchOutcome::Match(route_match));
                }
                _ => {}
            }
        }
        None
    }

    /// Assemble the route addressed by `options.name`.
    pub fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        registry: Option<&LocaleRegistry>,
    ) -> Result<String, RouteError> {
        let name = options.name.as_deref().ok_or(RouteError::MissingName)?;
        let (head, rest) = match name.split_once(['/', '.']) {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };

        let route = self
            .get(head)
            .ok_or_else(|| RouteError::NotFound(head.to_string()))?;

        let mut child_options = options.clone();
        child_options.name = rest.map(str::to_string);

        if rest.is_some() && route.children().is_none() {
            return Err(RouteError::NoChildRoutes(head.to_string()));
        }

        route.assemble(params, &child_options, registry)
    }
}
