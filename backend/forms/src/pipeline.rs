//! # Submission
//!
//! ```text
//! Idle -> Validating -> Invalid -> Idle
//!                    -> Submitting -> Success -> reset + navigate
//!                                  -> Failure -> Idle with banner
//! ```
//!
//! A submit is split in two so the in-flight window is explicit:
//! [`FormState::begin_submit`] validates and hands out a [`Ticket`], and
//! [`FormState::settle`] applies the response for that ticket. [`Form::submit`]
//! drives both around a single remote call.
//!
//! - A submit begun while another is in flight is ignored, state untouched
//! - Invalid values never reach the remote
//! - No retries; a client-side timeout turns a call that never settles into a failure
//! - Responses for tickets issued before a reset or unmount are discarded
use std::{future::Future, time::Duration};

use models::Envelope;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::{
    error::{FormError, TransportError},
    schema::ValidationErrors,
    state::{FormState, FormValues},
};

pub const UNKNOWN_ERROR: &str = "An unknown error occurred";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a form sends its values once they validate.
pub trait Remote<T> {
    type Data;

    /// Client route to navigate to after a success envelope.
    fn success_route(&self) -> &'static str;

    fn send(
        &self,
        values: &T,
    ) -> impl Future<Output = Result<Envelope<Self::Data>, TransportError>>;
}

/// Proof that a submit is in flight, carrying the values that were validated.
#[derive(Debug)]
pub struct Ticket<T> {
    generation: u64,
    values: T,
}

impl<T> Ticket<T> {
    pub fn values(&self) -> &T {
        &self.values
    }
}

#[derive(Debug)]
pub enum Begin<T> {
    Ready(Ticket<T>),
    Invalid(ValidationErrors),
    Busy,
}

#[derive(Debug)]
pub enum Outcome<D> {
    /// Remote accepted; the form was reset.
    Success {
        route: &'static str,
        data: Option<D>,
    },
    /// Blocked locally, nothing was sent.
    Invalid(ValidationErrors),
    /// Remote answered with a failure envelope; its message is now the banner.
    Rejected(String),
    /// Transport or decoding failure; the banner holds a generic message.
    Failed(TransportError),
    /// Another submit was already in flight.
    Ignored,
    /// The form was reset or unmounted before the response arrived.
    Discarded,
}

impl<D> Outcome<D> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

impl<T: FormValues> FormState<T> {
    pub fn begin_submit(&mut self) -> Result<Begin<T>, FormError> {
        if self.is_submitting {
            debug!("Submit already in flight, ignoring");
            return Ok(Begin::Busy);
        }

        self.touch_all();
        let errors = self.validate()?;
        if !errors.is_empty() {
            return Ok(Begin::Invalid(errors.clone()));
        }

        self.is_submitting = true;

        Ok(Begin::Ready(Ticket {
            generation: self.generation,
            values: self.values.clone(),
        }))
    }

    pub fn settle<D>(
        &mut self,
        ticket: Ticket<T>,
        route: &'static str,
        response: Result<Envelope<D>, TransportError>,
    ) -> Outcome<D> {
        if ticket.generation != self.generation {
            debug!("Form went away before the response arrived, discarding");
            return Outcome::Discarded;
        }

        self.is_submitting = false;

        match response {
            Ok(envelope) if envelope.success => {
                self.reset();

                Outcome::Success {
                    route,
                    data: envelope.data,
                }
            }
            Ok(envelope) => {
                warn!(message = %envelope.message, "Submission rejected");

                let message = if envelope.message.is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    envelope.message
                };
                self.server_error = Some(message.clone());

                Outcome::Rejected(message)
            }
            Err(transport) => {
                error!("Submission failed: {transport}");
                self.server_error = Some(UNKNOWN_ERROR.to_string());

                Outcome::Failed(transport)
            }
        }
    }
}

/// A mounted form: its state plus the remote it submits to.
pub struct Form<T, R> {
    pub state: FormState<T>,
    remote: R,
    timeout: Duration,
}

impl<T: FormValues, R: Remote<T>> Form<T, R> {
    pub fn new(remote: R) -> Self {
        Self {
            state: FormState::new(),
            remote,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.state.set_field(name, value)
    }

    pub fn mark_touched(&mut self, name: &str) -> Result<(), FormError> {
        self.state.mark_touched(name)
    }

    pub async fn submit(&mut self) -> Result<Outcome<R::Data>, FormError> {
        let ticket = match self.state.begin_submit()? {
            Begin::Ready(ticket) => ticket,
            Begin::Invalid(errors) => return Ok(Outcome::Invalid(errors)),
            Begin::Busy => return Ok(Outcome::Ignored),
        };

        let response = timeout(self.timeout, self.remote.send(ticket.values()))
            .await
            .unwrap_or(Err(TransportError::Timeout(self.timeout)));

        Ok(self
            .state
            .settle(ticket, self.remote.success_route(), response))
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, future::Future, time::Duration};

    use models::{Envelope, HOME_ROUTE};

    use super::*;
    use crate::pages::login::LoginValues;

    /// Counts calls and answers with a canned envelope.
    struct Canned {
        calls: Cell<usize>,
        success: bool,
        message: &'static str,
    }

    impl Canned {
        fn new(success: bool, message: &'static str) -> Self {
            Self {
                calls: Cell::new(0),
                success,
                message,
            }
        }
    }

    impl Remote<LoginValues> for Canned {
        type Data = String;

        fn success_route(&self) -> &'static str {
            HOME_ROUTE
        }

        fn send(
            &self,
            values: &LoginValues,
        ) -> impl Future<Output = Result<Envelope<String>, TransportError>> {
            self.calls.set(self.calls.get() + 1);

            let envelope = if self.success {
                Envelope::ok(self.message, values.email.clone())
            } else {
                Envelope::failure(self.message)
            };

            async move { Ok(envelope) }
        }
    }

    struct Silent;

    impl Remote<LoginValues> for Silent {
        type Data = ();

        fn success_route(&self) -> &'static str {
            HOME_ROUTE
        }

        fn send(
            &self,
            _: &LoginValues,
        ) -> impl Future<Output = Result<Envelope<()>, TransportError>> {
            std::future::pending()
        }
    }

    fn filled<R: Remote<LoginValues>>(remote: R) -> Form<LoginValues, R> {
        let mut form = Form::new(remote);
        form.set_field("email", "a@x.com").unwrap();
        form.set_field("password", "password1").unwrap();
        form
    }

    #[tokio::test]
    async fn test_invalid_never_calls_remote() {
        let mut form = Form::new(Canned::new(true, "Login successful"));
        form.set_field("email", "nope").unwrap();

        let outcome = form.submit().await.unwrap();

        assert!(matches!(&outcome, Outcome::Invalid(errors) if errors.contains("email")));
        assert_eq!(form.remote().calls.get(), 0);
        assert!(form.state.is_touched("email"));
        assert!(form.state.is_touched("password"));
        assert!(!form.state.is_submitting());
    }

    #[tokio::test]
    async fn test_success_resets_and_navigates() {
        let mut form = filled(Canned::new(true, "Login successful"));

        let outcome = form.submit().await.unwrap();

        match outcome {
            Outcome::Success { route, data } => {
                assert_eq!(route, "/");
                assert_eq!(data.as_deref(), Some("a@x.com"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(form.remote().calls.get(), 1);
        assert_eq!(form.state.values().email, "");
        assert!(form.state.errors().is_empty());
        assert!(!form.state.is_submitting());
    }

    #[tokio::test]
    async fn test_rejection_keeps_values() {
        let mut form = filled(Canned::new(false, "Invalid credentials"));

        let outcome = form.submit().await.unwrap();

        assert!(matches!(&outcome, Outcome::Rejected(message) if message == "Invalid credentials"));
        assert_eq!(form.state.server_error(), Some("Invalid credentials"));
        assert_eq!(form.state.values().email, "a@x.com");
        assert!(!form.state.is_submitting());

        form.set_field("password", "password2").unwrap();
        assert_eq!(form.state.server_error(), None);
    }

    #[tokio::test]
    async fn test_empty_rejection_message() {
        let mut form = filled(Canned::new(false, ""));

        form.submit().await.unwrap();

        assert_eq!(form.state.server_error(), Some(UNKNOWN_ERROR));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_with_banner() {
        let mut form = filled(Silent).with_timeout(Duration::from_secs(3));

        let outcome = form.submit().await.unwrap();

        assert!(matches!(outcome, Outcome::Failed(TransportError::Timeout(_))));
        assert_eq!(form.state.server_error(), Some(UNKNOWN_ERROR));
        assert_eq!(form.state.values().password, "password1");
        assert!(!form.state.is_submitting());
    }

    #[test]
    fn test_reentrant_submit_ignored() {
        let mut state = FormState::<LoginValues>::new();
        state.set_field("email", "a@x.com").unwrap();
        state.set_field("password", "password1").unwrap();

        let Begin::Ready(ticket) = state.begin_submit().unwrap() else {
            panic!("expected a ticket");
        };
        assert!(state.is_submitting());
        assert!(matches!(state.begin_submit().unwrap(), Begin::Busy));

        let outcome = state.settle(ticket, HOME_ROUTE, Ok(Envelope::ok("ok", ())));
        assert!(outcome.is_success());
        assert!(!state.is_submitting());
    }

    #[test]
    fn test_response_after_unmount_discarded() {
        let mut state = FormState::<LoginValues>::new();
        state.set_field("email", "a@x.com").unwrap();
        state.set_field("password", "password1").unwrap();

        let Begin::Ready(ticket) = state.begin_submit().unwrap() else {
            panic!("expected a ticket");
        };
        state.unmount();

        let outcome = state.settle(
            ticket,
            HOME_ROUTE,
            Ok(Envelope::<()>::failure("User not found")),
        );

        assert!(matches!(outcome, Outcome::Discarded));
        assert_eq!(state.server_error(), None);
        assert_eq!(state.values().email, "a@x.com");
    }
}
