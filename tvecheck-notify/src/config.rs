//! Mail configuration.
//!
//! Mail is all-or-nothing: server, sender, password and recipient must all
//! be given. Anything less disables notifications with a warning rather
//! than failing the run.

use std::fmt;

/// Default SMTP submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Complete SMTP settings.
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// SMTP server host.
    pub server: String,
    /// SMTP server port.
    pub port: u16,
    /// Sender address, also the login user.
    pub sender: String,
    /// Login password.
    pub password: String,
    /// Report recipient.
    pub recipient: String,
}

// Keeps the password out of logs.
impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Result of checking the mail options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailSetup {
    /// Every field present.
    Enabled(MailConfig),
    /// No mail field given.
    Disabled,
    /// Some fields given, the listed ones missing.
    Incomplete {
        /// Names of the missing options.
        missing: Vec<&'static str>,
    },
}

impl MailSetup {
    /// Checks the individual options. Blank strings count as missing.
    pub fn from_parts(
        server: Option<String>,
        port: u16,
        sender: Option<String>,
        password: Option<String>,
        recipient: Option<String>,
    ) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let server = present(server);
        let sender = present(sender);
        let password = present(password);
        let recipient = present(recipient);

        let missing: Vec<&'static str> = [
            ("smtp-server", server.is_none()),
            ("sender-email", sender.is_none()),
            ("sender-password", password.is_none()),
            ("recipient-email", recipient.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (server, sender, password, recipient) {
            (Some(server), Some(sender), Some(password), Some(recipient)) => {
                Self::Enabled(MailConfig {
                    server,
                    port,
                    sender,
                    password,
                    recipient,
                })
            }
            _ if missing.len() == 4 => Self::Disabled,
            _ => Self::Incomplete { missing },
        }
    }

    /// The usable config, if any.
    pub fn config(&self) -> Option<&MailConfig> {
        match self {
            Self::Enabled(config) => Some(config),
            _ => None,
        }
    }
}
