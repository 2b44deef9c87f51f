use comadrelab_protocol::{DomCommand, Locale, Reaction, Target, TimerSlot};
use thiserror::Error;

use crate::config::ContactConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
}

/// Map an HTTP status to a submission outcome. Only 2xx counts as success.
pub fn check_status(status: u16) -> Result<(), SubmitError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(SubmitError::Status(status))
    }
}

/// The POST a front end must send. The body is the form's own field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub url: String,
    pub method: &'static str,
    pub accept: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Submission lifecycle of the contact form: idle → submitting →
/// succeeded | failed. A failed form can be submitted again.
#[derive(Debug, Clone, Default)]
pub struct ContactFormController {
    state: SubmissionState,
}

impl ContactFormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Handle a native submit event for a form whose `action` is `action`.
    ///
    /// The default navigation is always suppressed. Returns the request to
    /// send, or `None` while a previous request is still in flight.
    pub fn begin(
        &mut self,
        action: &str,
        config: &ContactConfig,
    ) -> (Reaction, Option<SubmitRequest>) {
        if self.state == SubmissionState::Submitting {
            return (Reaction::intercept(Vec::new()), None);
        }
        self.state = SubmissionState::Submitting;

        let reaction = Reaction::intercept(vec![
            DomCommand::CancelTimer {
                slot: TimerSlot::SubmitLabelRestore,
            },
            DomCommand::SetDisabled {
                target: Target::SubmitButton,
                disabled: true,
            },
            DomCommand::SetText {
                target: Target::SubmitButton,
                text: config.busy_label.clone(),
            },
        ]);
        let request = SubmitRequest {
            url: action.to_string(),
            method: "POST",
            accept: config.accept.clone(),
        };
        (reaction, Some(request))
    }

    /// Handle the end of the request. `locale` is read from the document
    /// marker at the moment the response arrives.
    pub fn finish(
        &mut self,
        outcome: Result<(), SubmitError>,
        locale: Locale,
        config: &ContactConfig,
    ) -> Vec<DomCommand> {
        match outcome {
            Ok(()) => {
                self.state = SubmissionState::Succeeded;
                vec![
                    DomCommand::ResetForm {
                        target: Target::ContactForm,
                    },
                    DomCommand::SetHidden {
                        target: Target::ContactForm,
                        hidden: true,
                    },
                    DomCommand::SetHidden {
                        target: Target::SuccessMessage,
                        hidden: false,
                    },
                ]
            }
            Err(_) => {
                self.state = SubmissionState::Failed;
                vec![
                    DomCommand::SetDisabled {
                        target: Target::SubmitButton,
                        disabled: false,
                    },
                    DomCommand::SetText {
                        target: Target::SubmitButton,
                        text: error_label(locale, config).to_string(),
                    },
                    DomCommand::StartTimer {
                        slot: TimerSlot::SubmitLabelRestore,
                        delay_ms: config.revert_delay_ms,
                        then: vec![DomCommand::SetHtml {
                            target: Target::SubmitButton,
                            html: idle_label_markup(config),
                        }],
                    },
                ]
            }
        }
    }
}

pub fn error_label(locale: Locale, config: &ContactConfig) -> &str {
    match locale {
        Locale::En => &config.error_label_en,
        Locale::Es => &config.error_label_es,
    }
}

/// The submit control's resting label: one `lang`-tagged span per locale,
/// left to the stylesheet to show or hide.
pub fn idle_label_markup(config: &ContactConfig) -> String {
    format!(
        r#"<span lang="en">{}</span><span lang="es">{}</span>"#,
        escape_html(&config.idle_label_en),
        escape_html(&config.idle_label_es),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
