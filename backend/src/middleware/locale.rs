//! Locale redirect middleware.
//!
//! Runs [`resolve`] once per request before any page handler. Requests whose
//! path already carries a supported locale pass through with a
//! [`ResolvedLocale`] in the request extensions; all others receive a
//! `307 Temporary Redirect` to the locale-prefixed path with the query string
//! preserved. Paths matching a configured exclusion prefix (framework assets,
//! API routes, probes, favicon, images) bypass resolution entirely.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Locale, ResolutionInput, ResolutionOutcome, SupportedLocales, resolve};

/// Default name of the locale preference cookie.
pub const DEFAULT_LOCALE_COOKIE: &str = "NEXT_LOCALE";

/// Path prefixes excluded from locale interception by default.
pub const DEFAULT_EXCLUDED_PREFIXES: [&str; 5] =
    ["/_next", "/api", "/health", "/favicon.ico", "/images"];

/// Configured path prefixes that bypass locale resolution.
///
/// Matching is a plain prefix test, so `/api` also excludes `/apidocs`.
///
/// # Examples
/// ```
/// use storefront_edge::middleware::RouteExclusions;
///
/// let exclusions = RouteExclusions::default();
/// assert!(exclusions.is_excluded("/api/v1/verification/resend"));
/// assert!(exclusions.is_excluded("/favicon.ico"));
/// assert!(!exclusions.is_excluded("/shop"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteExclusions {
    prefixes: Vec<String>,
}

impl Default for RouteExclusions {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_PREFIXES)
    }
}

impl RouteExclusions {
    /// Build from prefixes; blank entries are dropped and a leading `/` is
    /// added where missing.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .filter_map(|raw| {
                let trimmed = raw.as_ref().trim();
                match trimmed {
                    "" => None,
                    p if p.starts_with('/') => Some(p.to_owned()),
                    p => Some(format!("/{p}")),
                }
            })
            .collect();
        Self { prefixes }
    }

    /// Whether `path` bypasses locale resolution.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}

/// Everything the middleware needs to resolve a request.
#[derive(Debug, Clone)]
pub struct LocaleRouting {
    locales: SupportedLocales,
    cookie_name: String,
    exclusions: RouteExclusions,
}

impl LocaleRouting {
    /// Routing with the default cookie name and exclusions.
    #[must_use]
    pub fn new(locales: SupportedLocales) -> Self {
        Self {
            locales,
            cookie_name: DEFAULT_LOCALE_COOKIE.to_owned(),
            exclusions: RouteExclusions::default(),
        }
    }

    /// Override the locale cookie name.
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Override the excluded prefixes.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: RouteExclusions) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Supported locales.
    #[must_use]
    pub const fn locales(&self) -> &SupportedLocales {
        &self.locales
    }
}

/// Locale found in the request path, available to handlers behind
/// [`LocaleRedirect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale(pub Locale);

impl FromRequest for ResolvedLocale {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = req.extensions().get::<Self>().cloned();
        ready(resolved.ok_or_else(|| {
            actix_web::error::ErrorNotFound("request path carries no supported locale")
        }))
    }
}

/// Middleware redirecting unlocalized page requests.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use storefront_edge::domain::SupportedLocales;
/// use storefront_edge::middleware::{LocaleRedirect, LocaleRouting};
///
/// let locales = SupportedLocales::parse(["en", "fr", "es"], "en").expect("valid set");
/// let app = App::new().wrap(LocaleRedirect::new(LocaleRouting::new(locales)));
/// ```
#[derive(Clone)]
pub struct LocaleRedirect {
    routing: Arc<LocaleRouting>,
}

impl LocaleRedirect {
    /// Wrap the routing configuration.
    #[must_use]
    pub fn new(routing: LocaleRouting) -> Self {
        Self {
            routing: Arc::new(routing),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LocaleRedirect
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = LocaleRedirectMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LocaleRedirectMiddleware {
            service: Rc::new(service),
            routing: Arc::clone(&self.routing),
        }))
    }
}

/// Service wrapper produced by [`LocaleRedirect`].
pub struct LocaleRedirectMiddleware<S> {
    service: Rc<S>,
    routing: Arc<LocaleRouting>,
}

impl<S, B> LocaleRedirectMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    fn forward(
        &self,
        req: ServiceRequest,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

impl<S, B> Service<ServiceRequest> for LocaleRedirectMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_owned();
        if self.routing.exclusions.is_excluded(&path) {
            return self.forward(req);
        }

        let cookie = req.cookie(&self.routing.cookie_name);
        let accept_language = req
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        let input = ResolutionInput::new(&path)
            .with_cookie(cookie.as_ref().map(|c| c.value()))
            .with_accept_language(accept_language);
        let outcome = resolve(&input, &self.routing.locales);

        match outcome {
            ResolutionOutcome::AlreadyLocalized { locale } => {
                req.extensions_mut().insert(ResolvedLocale(locale));
                self.forward(req)
            }
            ResolutionOutcome::Redirect(redirect) => {
                let location = match req.query_string() {
                    "" => redirect.location().to_owned(),
                    query => format!("{}?{query}", redirect.location()),
                };
                debug!(
                    locale = %redirect.locale(),
                    source = redirect.source().as_str(),
                    %path,
                    "redirecting to localized path"
                );
                let response = HttpResponse::TemporaryRedirect()
                    .insert_header((header::LOCATION, location))
                    .finish()
                    .map_into_right_body();
                Box::pin(ready(Ok(req.into_response(response))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, web};
    use rstest::{fixture, rstest};

    #[fixture]
    fn routing() -> LocaleRouting {
        let locales = SupportedLocales::parse(["en", "fr", "es"], "en").expect("valid set");
        LocaleRouting::new(locales)
    }

    async fn echo_locale(locale: ResolvedLocale) -> HttpResponse {
        HttpResponse::Ok().body(locale.0.to_string())
    }

    async fn call(routing: LocaleRouting, req: actix_test::TestRequest) -> ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .wrap(LocaleRedirect::new(routing))
                .route(
                    "/api/ping",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                )
                .default_service(web::to(echo_locale)),
        )
        .await;
        actix_test::call_service(&app, req.to_request())
            .await
            .map_into_boxed_body()
    }

    fn location<B>(res: &ServiceResponse<B>) -> &str {
        res.headers()
            .get(header::LOCATION)
            .expect("location header")
            .to_str()
            .expect("ascii location")
    }

    #[rstest]
    #[actix_web::test]
    async fn redirects_with_query_string(routing: LocaleRouting) {
        let req = actix_test::TestRequest::get()
            .uri("/products/42?ref=footer&page=2")
            .insert_header((header::ACCEPT_LANGUAGE, "fr-CA,en;q=0.8"));
        let res = call(routing, req).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), "/fr/products/42?ref=footer&page=2");
    }

    #[rstest]
    #[actix_web::test]
    async fn cookie_beats_header(routing: LocaleRouting) {
        let req = actix_test::TestRequest::get()
            .uri("/cart")
            .cookie(Cookie::new(DEFAULT_LOCALE_COOKIE, "es"))
            .insert_header((header::ACCEPT_LANGUAGE, "fr"));
        let res = call(routing, req).await;
        assert_eq!(location(&res), "/es/cart");
    }

    #[rstest]
    #[actix_web::test]
    async fn custom_cookie_name_is_honoured(routing: LocaleRouting) {
        let routing = routing.with_cookie_name("lang");
        let req = actix_test::TestRequest::get()
            .uri("/cart")
            .cookie(Cookie::new("lang", "fr"))
            .cookie(Cookie::new(DEFAULT_LOCALE_COOKIE, "es"));
        let res = call(routing, req).await;
        assert_eq!(location(&res), "/fr/cart");
    }

    #[rstest]
    #[actix_web::test]
    async fn localized_paths_reach_handler_with_locale(routing: LocaleRouting) {
        let req = actix_test::TestRequest::get().uri("/es/privacy-policy");
        let res = call(routing, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = actix_test::read_body(res).await;
        assert_eq!(body.as_ref(), b"es");
    }

    #[rstest]
    #[actix_web::test]
    async fn excluded_paths_bypass_resolution(routing: LocaleRouting) {
        let res = call(routing.clone(), actix_test::TestRequest::get().uri("/api/ping")).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = call(routing, actix_test::TestRequest::get().uri("/favicon.ico")).await;
        assert_eq!(
            res.status(),
            StatusCode::NOT_FOUND,
            "excluded paths fall through to handlers without a resolved locale"
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn custom_exclusions_replace_defaults(routing: LocaleRouting) {
        let routing = routing.with_exclusions(RouteExclusions::new(["static"]));
        let res = call(routing.clone(), actix_test::TestRequest::get().uri("/api/ping")).await;
        assert_eq!(location(&res), "/en/api/ping");

        let res = call(routing, actix_test::TestRequest::get().uri("/static/app.css")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case("/_next/static/chunk.js", true)]
    #[case("/images/banner.png", true)]
    #[case("/health/ready", true)]
    #[case("/apidocs", true)]
    #[case("/en/api", false)]
    #[case("/", false)]
    fn default_exclusions_match_prefixes(#[case] path: &str, #[case] excluded: bool) {
        assert_eq!(RouteExclusions::default().is_excluded(path), excluded);
    }

    #[rstest]
    fn exclusions_normalise_entries() {
        let exclusions = RouteExclusions::new(["  ", "assets", "/api"]);
        assert!(exclusions.is_excluded("/assets/logo.svg"));
        assert!(exclusions.is_excluded("/api/v1"));
        assert!(!exclusions.is_excluded("/"));
    }
}
