//! The portal's anti-bot search flow as an explicit state machine.
//!
//! ```text
//! Init -> PageFetched -> CaptchaExtracted -> CaptchaValidated
//!      -> SearchSubmitted -> Parsed
//! ```
//!
//! Any stage may instead move to `Failed`, which is terminal. The CAPTCHA
//! is a plain-text challenge rendered into the page, so "solving" it is
//! reading it back and echoing it in the validation and search requests,
//! together with the page's anti-forgery token and session cookies.

use std::sync::{Arc, LazyLock};

use case_lookup_case_models::{CaseQuery, SearchOutcome};
use scraper::{Html, Selector};

use crate::{
    PortalConfig, ScrapeError, Stage, TransportError,
    parse::{RawPage, ResultsParser},
    progress::{PipelineObserver, null_observer},
    text::element_text,
    transport::{PortalRequest, PortalResponse, Transport},
};

static CAPTCHA_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span#captcha-code").unwrap_or_else(|_| unreachable!()));
static TOKEN_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[name="_token"][type="hidden"]"#).unwrap_or_else(|_| unreachable!())
});

/// Shown in logs instead of the full anti-forgery token.
const TOKEN_LOG_PREFIX_LEN: usize = 20;

/// Session material carried from extraction to submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    cookies: Vec<String>,
    captcha: String,
    token: String,
}

impl SessionContext {
    #[must_use]
    pub fn new(cookies: Vec<String>, captcha: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            cookies,
            captcha: captcha.into(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn captcha(&self) -> &str {
        &self.captcha
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn cookies(&self) -> &[String] {
        &self.cookies
    }

    /// `Cookie` header value, if any cookies were issued.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            None
        } else {
            Some(self.cookies.join("; "))
        }
    }

    /// A new context carrying cookies from a later response merged in,
    /// replacing any with the same name. `self` is left untouched.
    #[must_use]
    pub fn with_cookies(&self, cookies: &[String]) -> Self {
        let mut merged = self.cookies.clone();
        for cookie in cookies {
            let name = cookie_name(cookie);
            if let Some(existing) = merged.iter_mut().find(|c| cookie_name(c) == name) {
                existing.clone_from(cookie);
            } else {
                merged.push(cookie.clone());
            }
        }
        Self::new(merged, self.captcha.clone(), self.token.clone())
    }

    fn token_preview(&self) -> &str {
        self.token
            .char_indices()
            .nth(TOKEN_LOG_PREFIX_LEN)
            .map_or(self.token.as_str(), |(i, _)| &self.token[..i])
    }
}

fn cookie_name(cookie: &str) -> &str {
    cookie.split('=').next().unwrap_or(cookie)
}

/// Where a search currently stands.
#[derive(Debug)]
pub enum PipelineState {
    Init,
    PageFetched {
        page: RawPage,
        cookies: Vec<String>,
    },
    CaptchaExtracted(SessionContext),
    CaptchaValidated(SessionContext),
    SearchSubmitted(RawPage),
    /// Terminal: the results page was classified.
    Parsed(SearchOutcome),
    /// Terminal: a stage failed and no later request was made.
    Failed(ScrapeError),
}

impl PipelineState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Parsed(_) | Self::Failed(_))
    }

    /// The stage that runs next from this state, if any.
    #[must_use]
    pub const fn next_stage(&self) -> Option<Stage> {
        match self {
            Self::Init => Some(Stage::Fetch),
            Self::PageFetched { .. } => Some(Stage::Extract),
            Self::CaptchaExtracted(_) => Some(Stage::Validate),
            Self::CaptchaValidated(_) => Some(Stage::Submit),
            Self::SearchSubmitted(_) => Some(Stage::Parse),
            Self::Parsed(_) | Self::Failed(_) => None,
        }
    }

    /// Collapses a terminal state into the caller-facing outcome.
    #[must_use]
    pub fn into_outcome(self) -> SearchOutcome {
        match self {
            Self::Parsed(outcome) => outcome,
            Self::Failed(e) => e.into_outcome(),
            other => SearchOutcome::Error {
                reason: format!("search stopped before completion at {:?}", other.next_stage()),
            },
        }
    }
}

/// Reads the CAPTCHA text and anti-forgery token from the lookup page.
///
/// # Errors
///
/// Returns [`ScrapeError::Extraction`] naming whichever element is missing
/// or empty.
pub fn extract_session(page: &RawPage, cookies: Vec<String>) -> Result<SessionContext, ScrapeError> {
    let document = Html::parse_document(page.as_str());

    let captcha = document
        .select(&CAPTCHA_SEL)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .ok_or(ScrapeError::Extraction {
            element: "captcha-code",
        })?;

    let token = document
        .select(&TOKEN_SEL)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ScrapeError::Extraction { element: "_token" })?;

    Ok(SessionContext::new(cookies, captcha, token))
}

/// Runs one search through the portal.
pub struct SessionPipeline {
    transport: Arc<dyn Transport>,
    config: PortalConfig,
    parser: ResultsParser,
    observer: Arc<dyn PipelineObserver>,
}

impl SessionPipeline {
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if the configured base URL is
    /// malformed.
    pub fn new(config: PortalConfig, transport: Arc<dyn Transport>) -> Result<Self, TransportError> {
        let parser = ResultsParser::new(config.origin()?);
        Ok(Self {
            transport,
            config,
            parser,
            observer: null_observer(),
        })
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Runs the full flow for `query` and returns its outcome.
    pub async fn execute(&self, query: &CaseQuery) -> SearchOutcome {
        let outcome = self.run(query).await.into_outcome();
        self.observer.on_finish(&outcome);
        outcome
    }

    /// Advances from [`PipelineState::Init`] until a terminal state.
    pub async fn run(&self, query: &CaseQuery) -> PipelineState {
        log::info!("Starting case search for {query}");

        let mut state = PipelineState::Init;
        while let Some(stage) = state.next_stage() {
            self.observer.on_stage(stage);
            log::info!("{}", stage.label());
            state = self.advance(state, query).await;
        }

        if let PipelineState::Failed(e) = &state {
            log::error!("Case search for {query} failed: {e}");
        }

        state
    }

    async fn advance(&self, state: PipelineState, query: &CaseQuery) -> PipelineState {
        match state {
            PipelineState::Init => {
                let request = PortalRequest::get(self.config.case_search_url());
                match self.send(Stage::Fetch, request).await {
                    Ok(response) => PipelineState::PageFetched {
                        page: RawPage::new(response.body),
                        cookies: response.cookies,
                    },
                    Err(e) => PipelineState::Failed(e),
                }
            }
            PipelineState::PageFetched { page, cookies } => match extract_session(&page, cookies) {
                Ok(ctx) => {
                    log::info!(
                        "Extracted captcha: {}, token: {}...",
                        ctx.captcha(),
                        ctx.token_preview()
                    );
                    PipelineState::CaptchaExtracted(ctx)
                }
                Err(e) => PipelineState::Failed(e),
            },
            PipelineState::CaptchaExtracted(ctx) => {
                let request = self.validate_request(&ctx);
                match self.send(Stage::Validate, request).await {
                    Ok(response) => PipelineState::CaptchaValidated(ctx.with_cookies(&response.cookies)),
                    Err(e) => PipelineState::Failed(e),
                }
            }
            PipelineState::CaptchaValidated(ctx) => {
                let request = self.submit_request(&ctx, query);
                match self.send(Stage::Submit, request).await {
                    Ok(response) => PipelineState::SearchSubmitted(RawPage::new(response.body)),
                    Err(e) => PipelineState::Failed(e),
                }
            }
            PipelineState::SearchSubmitted(page) => PipelineState::Parsed(self.parser.parse(&page)),
            terminal @ (PipelineState::Parsed(_) | PipelineState::Failed(_)) => terminal,
        }
    }

    /// Sends `request`, treating transport failures and non-2xx statuses as
    /// a failure of `stage`.
    async fn send(&self, stage: Stage, request: PortalRequest) -> Result<PortalResponse, ScrapeError> {
        let response = self
            .transport
            .fetch(request)
            .await
            .map_err(|source| ScrapeError::Transport { stage, source })?;

        if !response.is_success() {
            return Err(ScrapeError::Transport {
                stage,
                source: TransportError::Status(response.status),
            });
        }

        Ok(response)
    }

    fn with_session_headers(&self, request: PortalRequest, ctx: &SessionContext) -> PortalRequest {
        let request = request
            .with_header("Origin", self.config.base_url.clone())
            .with_header("Referer", self.config.case_search_url())
            .with_header("Sec-Fetch-Site", "same-origin");
        match ctx.cookie_header() {
            Some(cookie) => request.with_header("Cookie", cookie),
            None => request,
        }
    }

    fn validate_request(&self, ctx: &SessionContext) -> PortalRequest {
        let request = PortalRequest::post(self.config.validate_captcha_url())
            .with_header("X-Requested-With", "XMLHttpRequest")
            .with_header("Accept", "*/*")
            .with_header("Sec-Fetch-Mode", "cors")
            .with_header("Sec-Fetch-Dest", "empty")
            .with_field("_token", ctx.token())
            .with_field("captchaInput", ctx.captcha());
        self.with_session_headers(request, ctx)
    }

    fn submit_request(&self, ctx: &SessionContext, query: &CaseQuery) -> PortalRequest {
        let request = PortalRequest::post(self.config.case_search_url())
            .with_header("Cache-Control", "max-age=0")
            .with_header("Upgrade-Insecure-Requests", "1")
            .with_header("Sec-Fetch-Mode", "navigate")
            .with_header("Sec-Fetch-Dest", "document")
            .with_field("_token", ctx.token())
            .with_field("case_type", query.case_type_code())
            .with_field("case_number", query.case_number())
            .with_field("year", query.year())
            .with_field("randomid", ctx.captcha())
            .with_field("captchaInput", ctx.captcha());
        self.with_session_headers(request, ctx)
    }
}

#[cfg(test)]
mod tests {
    use case_lookup_case_models::SearchStatus;

    use super::*;
    use crate::{
        testing::{CASE_STATUS_PAGE, LOOKUP_PAGE, ScriptedTransport, RecordingObserver},
        transport::Method,
    };

    fn query() -> CaseQuery {
        CaseQuery::new("CRLMM", "558", "2025").unwrap()
    }

    fn pipeline(transport: &Arc<ScriptedTransport>) -> SessionPipeline {
        SessionPipeline::new(PortalConfig::new("https://portal.example"), transport.clone()).unwrap()
    }

    #[test]
    fn extracts_captcha_and_token() {
        let ctx = extract_session(&RawPage::new(LOOKUP_PAGE), vec!["s=1".to_owned()]).unwrap();
        assert_eq!(ctx.captcha(), "A1B2C");
        assert_eq!(ctx.token(), "tok_0123456789abcdefghijklmnop");
        assert_eq!(ctx.cookie_header().as_deref(), Some("s=1"));
    }

    #[test]
    fn missing_captcha_is_an_extraction_error() {
        let page = RawPage::new(r#"<input type="hidden" name="_token" value="t">"#);
        let err = extract_session(&page, Vec::new()).unwrap_err();
        assert!(matches!(err, ScrapeError::Extraction { element: "captcha-code" }));
    }

    #[test]
    fn empty_token_is_an_extraction_error() {
        let page = RawPage::new(
            r#"<span id="captcha-code">XY12</span><input type="hidden" name="_token" value="  ">"#,
        );
        let err = extract_session(&page, Vec::new()).unwrap_err();
        assert!(matches!(err, ScrapeError::Extraction { element: "_token" }));
    }

    #[test]
    fn later_cookies_replace_earlier_ones_by_name() {
        let ctx = SessionContext::new(vec!["a=1".to_owned(), "b=2".to_owned()], "c", "t");
        let merged = ctx.with_cookies(&["b=3".to_owned(), "c=4".to_owned()]);

        assert_eq!(merged.cookies(), ["a=1", "b=3", "c=4"]);
        assert_eq!(merged.captcha(), "c");
        assert_eq!(merged.token(), "t");
        assert_eq!(ctx.cookies(), ["a=1", "b=2"]);
    }

    #[tokio::test]
    async fn runs_all_stages_in_order() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(PortalResponse::ok(LOOKUP_PAGE).with_cookie("XSRF-TOKEN=x")),
            Ok(PortalResponse::ok("{\"success\":true}").with_cookie("session=s")),
            Ok(PortalResponse::ok(CASE_STATUS_PAGE)),
        ]));
        let observer = Arc::new(RecordingObserver::default());

        let outcome = pipeline(&transport)
            .with_observer(observer.clone())
            .execute(&query())
            .await;

        assert_eq!(outcome.status(), SearchStatus::Success);
        assert_eq!(outcome.records().len(), 2);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);

        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].url, "https://portal.example/app/case-number");

        assert_eq!(requests[1].url, "https://portal.example/app/validateCaptcha");
        assert_eq!(requests[1].field("_token"), Some("tok_0123456789abcdefghijklmnop"));
        assert_eq!(requests[1].field("captchaInput"), Some("A1B2C"));
        assert_eq!(requests[1].header("X-Requested-With"), Some("XMLHttpRequest"));
        assert_eq!(requests[1].header("Cookie"), Some("XSRF-TOKEN=x"));

        assert_eq!(requests[2].url, "https://portal.example/app/case-number");
        assert_eq!(requests[2].field("case_type"), Some("CRLMM"));
        assert_eq!(requests[2].field("case_number"), Some("558"));
        assert_eq!(requests[2].field("year"), Some("2025"));
        assert_eq!(requests[2].field("randomid"), Some("A1B2C"));
        assert_eq!(requests[2].field("captchaInput"), Some("A1B2C"));
        assert_eq!(requests[2].header("Cookie"), Some("XSRF-TOKEN=x; session=s"));
        assert_eq!(requests[2].header("Referer"), Some("https://portal.example/app/case-number"));

        assert_eq!(
            observer.stages(),
            [Stage::Fetch, Stage::Extract, Stage::Validate, Stage::Submit, Stage::Parse]
        );
        assert_eq!(observer.finished(), Some(SearchStatus::Success));
    }

    #[tokio::test]
    async fn extraction_failure_stops_before_validation() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(PortalResponse::ok(
            "<html><body>maintenance</body></html>",
        ))]));

        let state = pipeline(&transport).run(&query()).await;

        let PipelineState::Failed(err) = state else {
            panic!("expected failure, got {state:?}");
        };
        assert_eq!(err.stage(), Some(Stage::Extract));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn validation_rejection_stops_before_submit() {
        let mut rejected = PortalResponse::ok("denied");
        rejected.status = 419;
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(PortalResponse::ok(LOOKUP_PAGE)),
            Ok(rejected),
        ]));

        let outcome = pipeline(&transport).execute(&query()).await;

        assert_eq!(outcome.status(), SearchStatus::Error);
        assert_eq!(outcome.reason(), Some("validate failed: HTTP status 419"));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn submit_rejection_is_submit_failure() {
        let mut rejected = PortalResponse::ok("server error");
        rejected.status = 500;
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(PortalResponse::ok(LOOKUP_PAGE)),
            Ok(PortalResponse::ok("{\"success\":true}")),
            Ok(rejected),
        ]));

        let state = pipeline(&transport).run(&query()).await;

        let PipelineState::Failed(err) = state else {
            panic!("expected failure, got {state:?}");
        };
        assert_eq!(err.stage(), Some(Stage::Submit));
        assert_eq!(err.to_string(), "submit failed: HTTP status 500");
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn fetch_timeout_fails_fetch_stage() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportError::Timeout)]));

        let outcome = pipeline(&transport).execute(&query()).await;

        assert_eq!(
            outcome,
            SearchOutcome::Error {
                reason: "fetch failed: request timed out".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn no_results_page_is_terminal_parsed_state() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(PortalResponse::ok(LOOKUP_PAGE)),
            Ok(PortalResponse::ok("ok")),
            Ok(PortalResponse::ok("<div class=\"alert\">No Record Found</div>")),
        ]));

        let state = pipeline(&transport).run(&query()).await;

        let PipelineState::Parsed(outcome) = state else {
            panic!("expected parsed state, got {state:?}");
        };
        assert_eq!(outcome.status(), SearchStatus::NoResults);
    }
}
