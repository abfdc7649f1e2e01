//! Auth screens: login, registration, and password reset
//!
//! Each screen is a form model. Submission is split in three steps so the
//! rendering layer can show the loading state while the provider call is in
//! flight:
//!
//! 1. `begin_submit` validates locally and raises `is_loading`. A validation
//!    failure sets a blocking alert and no request is produced.
//! 2. [`AuthRequest::send`] performs the provider call.
//! 3. `finish_submit` always clears `is_loading` and sets the result alert.
//!
//! `submit` runs all three in sequence.

use crate::components::{password_toggle_icon, Button, ButtonVariant, Icon};
use crate::navigation::{Navigator, Route, LOGIN_PATH};
use app_core::auth::{self, AuthError, AuthService};
use app_core::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};

/// Title of error alerts
pub const ERROR_TITLE: &str = "Error";

/// A blocking alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert title
    pub title: String,
    /// Alert body
    pub message: String,
}

impl Alert {
    /// Create an alert
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into() }
    }

    /// Error alert with the given message
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ERROR_TITLE, message)
    }
}

/// Result of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A previous submission is still in flight
    Busy,
    /// Blocked by local validation; no provider call was made
    Invalid(ValidationError),
    /// The provider call failed
    Failed(AuthError),
    /// The provider call succeeded
    Succeeded,
}

impl SubmitOutcome {
    /// Whether the provider call succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded)
    }
}

/// A validated provider call, detached from the screen that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    /// Sign in
    SignIn {
        /// Email address
        email: String,
        /// Password
        password: String,
    },
    /// Create an account
    SignUp {
        /// Email address
        email: String,
        /// Password
        password: String,
    },
    /// Send a password reset email
    ResetPassword {
        /// Email address
        email: String,
    },
}

impl AuthRequest {
    /// Perform the provider call
    pub async fn send(&self, auth: &AuthService) -> auth::Result<()> {
        match self {
            AuthRequest::SignIn { email, password } => auth.sign_in(email, password).await,
            AuthRequest::SignUp { email, password } => auth.sign_up(email, password).await,
            AuthRequest::ResetPassword { email } => auth.reset_password(email).await,
        }
    }
}

fn go_back_or(navigator: &dyn Navigator, fallback: &str) {
    if !navigator.back() {
        navigator.replace(fallback);
    }
}

// =============================================================================
// Login
// =============================================================================

/// Login form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginScreen {
    email: String,
    password: String,
    password_visible: bool,
    is_loading: bool,
    alert: Option<Alert>,
}

impl LoginScreen {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Email field
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Update the email field
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Update the password field
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Whether the password is shown in clear text
    pub fn is_password_visible(&self) -> bool {
        self.password_visible
    }

    /// Show or hide the password
    pub fn toggle_password_visibility(&mut self) {
        self.password_visible = !self.password_visible;
    }

    /// Icon of the visibility toggle
    pub fn password_toggle_icon(&self) -> Icon {
        password_toggle_icon(self.password_visible)
    }

    /// Whether a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Pending alert
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Dismiss the pending alert
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Submit button
    pub fn submit_button(&self) -> Button {
        Button::new("Sign In")
            .with_loading_label("Signing in...")
            .loading(self.is_loading)
    }

    /// "Forgot password?" link
    pub fn forgot_password_button(&self) -> Button {
        Button::new("Forgot password?")
            .with_variant(ButtonVariant::Link)
            .disabled(self.is_loading)
    }

    /// Open the password reset screen
    pub fn go_to_reset_password(&self, navigator: &dyn Navigator) {
        navigator.push(&Route::ResetPassword.to_path());
    }

    /// Open the registration screen
    pub fn go_to_register(&self, navigator: &dyn Navigator) {
        navigator.push(&Route::Register.to_path());
    }

    /// Validate and raise the loading flag
    pub fn begin_submit(&mut self) -> Result<AuthRequest, SubmitOutcome> {
        if self.is_loading {
            return Err(SubmitOutcome::Busy);
        }
        if let Err(e) = validation::validate_login(&self.email, &self.password) {
            self.alert = Some(Alert::error(e.to_string()));
            return Err(SubmitOutcome::Invalid(e));
        }

        self.alert = None;
        self.is_loading = true;
        Ok(AuthRequest::SignIn {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Clear the loading flag and record the result
    ///
    /// Success needs no navigation here: the route guard moves a signed-in
    /// user off the auth screens.
    pub fn finish_submit(&mut self, result: auth::Result<()>) -> SubmitOutcome {
        self.is_loading = false;
        match result {
            Ok(()) => SubmitOutcome::Succeeded,
            Err(e) => {
                self.alert = Some(Alert::error(e.user_message()));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Validate, sign in, and record the result
    pub async fn submit(&mut self, auth: &AuthService) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(request) => {
                let result = request.send(auth).await;
                self.finish_submit(result)
            }
            Err(outcome) => outcome,
        }
    }
}

// =============================================================================
// Register
// =============================================================================

/// Alert shown after a successful registration
pub fn registration_success_alert() -> Alert {
    Alert::new("Success", "Please check your email to confirm your account.")
}

/// Registration form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterScreen {
    email: String,
    password: String,
    confirm_password: String,
    password_visible: bool,
    is_loading: bool,
    alert: Option<Alert>,
}

impl RegisterScreen {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the email field
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Update the password field
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Update the confirmation field
    pub fn set_confirm_password(&mut self, password: impl Into<String>) {
        self.confirm_password = password.into();
    }

    /// Show or hide both password fields
    pub fn toggle_password_visibility(&mut self) {
        self.password_visible = !self.password_visible;
    }

    /// Icon of the visibility toggle
    pub fn password_toggle_icon(&self) -> Icon {
        password_toggle_icon(self.password_visible)
    }

    /// Whether a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Pending alert
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Dismiss the pending alert
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Submit button
    pub fn submit_button(&self) -> Button {
        Button::new("Create Account")
            .with_loading_label("Creating account...")
            .loading(self.is_loading)
    }

    /// Return to the login screen
    pub fn go_to_login(&self, navigator: &dyn Navigator) {
        go_back_or(navigator, LOGIN_PATH);
    }

    /// Validate and raise the loading flag
    pub fn begin_submit(&mut self) -> Result<AuthRequest, SubmitOutcome> {
        if self.is_loading {
            return Err(SubmitOutcome::Busy);
        }
        if let Err(e) =
            validation::validate_registration(&self.email, &self.password, &self.confirm_password)
        {
            self.alert = Some(Alert::error(e.to_string()));
            return Err(SubmitOutcome::Invalid(e));
        }

        self.alert = None;
        self.is_loading = true;
        Ok(AuthRequest::SignUp {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Clear the loading flag and record the result
    ///
    /// On success the user is sent back to login to wait for the
    /// confirmation email.
    pub fn finish_submit(
        &mut self,
        result: auth::Result<()>,
        navigator: &dyn Navigator,
    ) -> SubmitOutcome {
        self.is_loading = false;
        match result {
            Ok(()) => {
                self.alert = Some(registration_success_alert());
                go_back_or(navigator, LOGIN_PATH);
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                self.alert = Some(Alert::error(e.user_message()));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Validate, sign up, and record the result
    pub async fn submit(&mut self, auth: &AuthService, navigator: &dyn Navigator) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(request) => {
                let result = request.send(auth).await;
                self.finish_submit(result, navigator)
            }
            Err(outcome) => outcome,
        }
    }
}

// =============================================================================
// Reset Password
// =============================================================================

/// Alert shown after a reset email was sent
pub fn reset_email_sent_alert() -> Alert {
    Alert::new("Check your email", "We sent you a link to reset your password.")
}

/// Password reset form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordScreen {
    email: String,
    is_loading: bool,
    alert: Option<Alert>,
}

impl ResetPasswordScreen {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the email field
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Whether a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Pending alert
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Dismiss the pending alert
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Submit button
    pub fn submit_button(&self) -> Button {
        Button::new("Send Reset Link")
            .with_loading_label("Sending...")
            .loading(self.is_loading)
    }

    /// Validate and raise the loading flag
    pub fn begin_submit(&mut self) -> Result<AuthRequest, SubmitOutcome> {
        if self.is_loading {
            return Err(SubmitOutcome::Busy);
        }
        if let Err(e) = validation::validate_reset(&self.email) {
            self.alert = Some(Alert::error(e.to_string()));
            return Err(SubmitOutcome::Invalid(e));
        }

        self.alert = None;
        self.is_loading = true;
        Ok(AuthRequest::ResetPassword { email: self.email.trim().to_string() })
    }

    /// Clear the loading flag and record the result
    pub fn finish_submit(
        &mut self,
        result: auth::Result<()>,
        navigator: &dyn Navigator,
    ) -> SubmitOutcome {
        self.is_loading = false;
        match result {
            Ok(()) => {
                self.alert = Some(reset_email_sent_alert());
                go_back_or(navigator, LOGIN_PATH);
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                self.alert = Some(Alert::error(e.user_message()));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Validate, request the reset email, and record the result
    pub async fn submit(&mut self, auth: &AuthService, navigator: &dyn Navigator) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(request) => {
                let result = request.send(auth).await;
                self.finish_submit(result, navigator)
            }
            Err(outcome) => outcome,
        }
    }
}
