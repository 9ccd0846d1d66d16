//! The request envelope accepted on the broker's HTTP surface.
//!
//! Callers name one action and attach the matching payload; the envelope
//! validates into a [`Command`] before any adapter is touched.

use std::fmt;

use relay_core::{AuthPayload, LogPayload, MailPayload};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The set of actions the broker knows how to relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Verify credentials against the authentication collaborator.
    Auth,
    /// Record a log event with the log service.
    Log,
    /// Relay an outbound mail request.
    Mail,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Auth => "auth",
            Action::Log => "log",
            Action::Mail => "mail",
        };
        f.write_str(name)
    }
}

/// Wire shape of a broker submission: an action tag plus at most one
/// payload matching it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Which action to perform.
    pub action: Action,
    /// Credentials, present when `action` is `auth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthPayload>,
    /// Log entry, present when `action` is `log`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogPayload>,
    /// Mail request, present when `action` is `mail`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<MailPayload>,
}

/// A validated submission: the action together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Authenticate the attached credentials.
    Auth(AuthPayload),
    /// Record the attached log entry.
    Log(LogPayload),
    /// Send the attached mail request.
    Mail(MailPayload),
}

/// The envelope named an action but did not carry its payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing {0} payload")]
pub struct MissingPayload(pub Action);

impl RequestEnvelope {
    /// Validates the envelope into a [`Command`].
    ///
    /// Extra payloads for other actions are ignored; only the one named
    /// by `action` is required.
    pub fn into_command(self) -> Result<Command, MissingPayload> {
        match self.action {
            Action::Auth => self.auth.map(Command::Auth).ok_or(MissingPayload(Action::Auth)),
            Action::Log => self.log.map(Command::Log).ok_or(MissingPayload(Action::Log)),
            Action::Mail => self.mail.map(Command::Mail).ok_or(MissingPayload(Action::Mail)),
        }
    }

    /// The log entry regardless of the action tag, for surfaces that only
    /// accept log submissions.
    pub fn into_log_entry(self) -> Result<LogPayload, MissingPayload> {
        self.log.ok_or(MissingPayload(Action::Log))
    }
}

impl Command {
    /// Action tag of this command.
    pub fn action(&self) -> Action {
        match self {
            Command::Auth(_) => Action::Auth,
            Command::Log(_) => Action::Log,
            Command::Mail(_) => Action::Mail,
        }
    }
}
