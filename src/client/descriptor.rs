//! How to reach a server.

use std::fmt;

/// Where a [`ClientDriver`](super::ClientDriver) finds its server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerDescriptor {
    /// Spawn a child process and speak MCP over its stdin/stdout.
    Process {
        command: String,
        args: Vec<String>,
        env: Vec<(String, String)>,
    },

    /// Connect to a server listening on a TCP address.
    #[cfg(feature = "tcp")]
    Tcp { address: String },
}

impl ServerDescriptor {
    /// A process descriptor with no arguments or extra environment.
    pub fn process(command: impl Into<String>) -> Self {
        Self::Process {
            command: command.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    #[cfg(feature = "tcp")]
    pub fn tcp(address: impl Into<String>) -> Self {
        Self::Tcp {
            address: address.into(),
        }
    }

    /// Append an argument. No effect on non-process descriptors.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        if let Self::Process { args, .. } = &mut self {
            args.push(value.into());
        }
        self
    }

    /// Set an environment variable for the child. No effect on non-process descriptors.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Process { env, .. } = &mut self {
            env.push((key.into(), value.into()));
        }
        self
    }
}

impl fmt::Display for ServerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process { command, args, .. } if args.is_empty() => write!(f, "{}", command),
            Self::Process { command, args, .. } => write!(f, "{} {}", command, args.join(" ")),
            #[cfg(feature = "tcp")]
            Self::Tcp { address } => write!(f, "tcp://{}", address),
        }
    }
}
