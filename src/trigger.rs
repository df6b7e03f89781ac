// src/trigger.rs
//! Profile analysis trigger - reads the id, calls the service, renders the result

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::app_log;
use crate::identifier::{analyze_path, profile_path, ProfileId};
use crate::page::Page;
use crate::render::{
    error_detail, render_http_error, render_success, EMPTY_ID_PROMPT, NETWORK_ERROR_MESSAGE,
    RUNNING_MESSAGE,
};
use crate::transport::{Method, RawResponse, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileAction {
    /// `POST /profiles/{id}/analyze`
    #[default]
    Analyze,
    /// `GET /profiles/{id}`
    Fetch,
}

impl ProfileAction {
    pub fn method(self) -> Method {
        match self {
            ProfileAction::Analyze => Method::Post,
            ProfileAction::Fetch => Method::Get,
        }
    }

    pub fn path(self, id: &ProfileId) -> String {
        match self {
            ProfileAction::Analyze => analyze_path(id),
            ProfileAction::Fetch => profile_path(id),
        }
    }
}

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Empty input, the user was prompted and nothing was sent.
    Aborted,
    Rendered(Value),
    HttpError { status: u16, detail: Option<String> },
    NetworkError,
}

impl Outcome {
    /// Text written to the output area, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Aborted => None,
            Outcome::Rendered(data) => Some(render_success(data)),
            Outcome::HttpError { status, detail } => {
                Some(render_http_error(*status, detail.as_deref()))
            }
            Outcome::NetworkError => Some(NETWORK_ERROR_MESSAGE.to_string()),
        }
    }
}

pub struct AnalysisTrigger {
    page: Page,
    transport: Arc<dyn Transport>,
    action: ProfileAction,
}

impl AnalysisTrigger {
    pub fn new(page: Page, transport: Arc<dyn Transport>) -> Self {
        Self {
            page,
            transport,
            action: ProfileAction::default(),
        }
    }

    pub fn with_action(mut self, action: ProfileAction) -> Self {
        self.action = action;
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// One full invocation. Every failure ends up as text in the output area.
    pub async fn run(&self) -> Outcome {
        match self.begin() {
            Some(id) => self.request(id).await,
            None => Outcome::Aborted,
        }
    }

    /// Synchronous part of an invocation: read and check the id, then show
    /// the running status. Returns `None` after prompting on empty input.
    fn begin(&self) -> Option<ProfileId> {
        let Some(id) = ProfileId::parse(&self.page.input.value()) else {
            app_log!(debug, "Empty profile id, request not sent");
            self.page.alert.alert(EMPTY_ID_PROMPT);
            return None;
        };

        if !id.is_url_safe() {
            app_log!(warn, "Profile id {:?} is spliced into the path unescaped", id.as_str());
        }

        self.page.output.set_text(RUNNING_MESSAGE);
        Some(id)
    }

    async fn request(&self, id: ProfileId) -> Outcome {
        let span = tracing::info_span!(
            "profile_request",
            invocation = %Uuid::new_v4(),
            profile_id = %id,
            action = ?self.action
        );

        async {
            let path = self.action.path(&id);
            let outcome = match self.transport.send(self.action.method(), &path).await {
                Ok(response) => Self::interpret(response),
                Err(e) => {
                    app_log!(error, "Profile request failed: {:#}", e);
                    Outcome::NetworkError
                }
            };

            if let Some(text) = outcome.message() {
                self.page.output.set_text(&text);
            }

            app_log!(info, "Profile request finished: {}", outcome_label(&outcome));
            outcome
        }
        .instrument(span)
        .await
    }

    fn interpret(response: RawResponse) -> Outcome {
        if !response.is_success() {
            return Outcome::HttpError {
                status: response.status,
                detail: error_detail(&response.body),
            };
        }

        // A success body that isn't JSON fails the same way a dropped connection does.
        match serde_json::from_slice::<Value>(&response.body) {
            Ok(data) => Outcome::Rendered(data),
            Err(e) => {
                app_log!(error, "Failed to parse profile response: {}", e);
                Outcome::NetworkError
            }
        }
    }

    /// Run on every click of the page button.
    ///
    /// The id is read and the running status shown during the click itself;
    /// the request then continues on its own task. Overlapping runs are
    /// neither ordered nor cancelled, so the output shows whichever finishes
    /// last. Outcomes are reported on the returned channel as they complete.
    pub fn attach(self: &Arc<Self>) -> Result<mpsc::UnboundedReceiver<Outcome>> {
        let handle = tokio::runtime::Handle::try_current()
            .context("Click handlers must be attached inside a tokio runtime")?;
        let (tx, rx) = mpsc::unbounded_channel();
        let trigger: Weak<Self> = Arc::downgrade(self);

        self.page.button.on_click(Arc::new(move || {
            let Some(trigger) = trigger.upgrade() else {
                return;
            };
            let Some(id) = trigger.begin() else {
                let _ = tx.send(Outcome::Aborted);
                return;
            };
            let tx = tx.clone();
            handle.spawn(async move {
                let outcome = trigger.request(id).await;
                let _ = tx.send(outcome);
            });
        }));

        Ok(rx)
    }
}

fn outcome_label(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Aborted => "aborted".to_string(),
        Outcome::Rendered(_) => "rendered".to_string(),
        Outcome::HttpError { status, .. } => format!("http error {}", status),
        Outcome::NetworkError => "network error".to_string(),
    }
}
